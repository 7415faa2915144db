// crates/markup-msg-core/src/markup.rs
// ============================================================================
// Module: Markup Model
// Description: Serializable markup tree consumed by extraction and produced by rendering.
// Purpose: Give drivers a concrete element representation for both pipelines.
// Dependencies: serde, crate::extract, crate::render
// ============================================================================

//! ## Overview
//! Source parsers (JSX, HTML templates, ...) lower their syntax trees into
//! [`MarkupNode`]s: text, nested elements, and expression slots. The same
//! [`MarkupElement`] type acts as an element template for the renderer, so a
//! message can be extracted and rendered back without another adapter.
//!
//! The serialized form is `kind`-tagged JSON:
//!
//! ```json
//! { "kind": "element", "tag": "p", "line": 3, "children": [
//!     { "kind": "text", "value": "Hello " },
//!     { "kind": "expression", "source": "user.name" } ] }
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::extract::MarkupChild;
use crate::extract::MarkupTree;
use crate::render::RenderedChild;
use crate::render::SlotTemplate;

// ============================================================================
// SECTION: Nodes
// ============================================================================

/// A child of a markup element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkupNode {
    /// Literal text.
    Text(TextNode),
    /// Nested element.
    Element(MarkupElement),
    /// Embedded expression whose value is supplied at render time.
    Expression(ExpressionSlot),
}

impl MarkupNode {
    /// Builds a text node without line information.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(TextNode {
            value: value.into(),
            line: None,
        })
    }

    /// Builds an expression slot without line information.
    pub fn expression(source: impl Into<String>) -> Self {
        Self::Expression(ExpressionSlot {
            source: source.into(),
            line: None,
        })
    }

    /// Returns the node's recorded line, if any.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        match self {
            Self::Text(text) => text.line,
            Self::Element(element) => element.line,
            Self::Expression(slot) => slot.line,
        }
    }
}

impl From<MarkupElement> for MarkupNode {
    fn from(element: MarkupElement) -> Self {
        Self::Element(element)
    }
}

/// Literal text inside an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// Raw text as written in the source.
    pub value: String,
    /// Line where the text starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Expression embedded in markup (for example `{user.name}` in JSX).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionSlot {
    /// Source text of the expression; the runtime evaluates it.
    pub source: String,
    /// Line where the expression starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

// ============================================================================
// SECTION: Elements
// ============================================================================

/// A markup element with attributes and children.
///
/// # Invariants
/// - `tag` is non-empty for elements produced by source parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupElement {
    /// Element name (`p`, `a`, `Link`, ...).
    pub tag: String,
    /// Attributes in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Children in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkupNode>,
    /// Line of the opening tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Keeps whitespace inside this element verbatim during extraction.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preserve_whitespace: bool,
}

impl MarkupElement {
    /// Creates an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            line: None,
            preserve_whitespace: false,
        }
    }

    /// Adds an attribute and returns the element.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value,
        });
        self
    }

    /// Appends a child and returns the element.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Sets the line and returns the element.
    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Returns the attribute named `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Returns true when an attribute named `name` is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns a copy without children, keeping tag and attributes.
    #[must_use]
    pub fn stripped(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
            line: self.line,
            preserve_whitespace: self.preserve_whitespace,
        }
    }
}

impl MarkupTree for MarkupElement {
    type Stripped = Self;
    type Expression = ExpressionSlot;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn children(&self) -> Vec<MarkupChild<'_, Self>> {
        self.children
            .iter()
            .map(|child| match child {
                MarkupNode::Text(text) => MarkupChild::Text(&text.value),
                MarkupNode::Element(element) => MarkupChild::Element(element),
                MarkupNode::Expression(slot) => MarkupChild::Expression(slot),
            })
            .collect()
    }

    fn strip(&self) -> Self {
        self.stripped()
    }

    fn preserves_whitespace(&self) -> bool {
        self.preserve_whitespace
    }
}

impl SlotTemplate for MarkupElement {
    type Element = Self;

    fn with_children(&self, children: Vec<RenderedChild<Self>>) -> Self {
        let mut element = self.stripped();
        element.children = children
            .into_iter()
            .map(|child| match child {
                RenderedChild::Text(value) => MarkupNode::text(value),
                RenderedChild::Element(element) => MarkupNode::Element(element),
            })
            .collect();
        element
    }
}

// ============================================================================
// SECTION: Attributes
// ============================================================================

/// A named element attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: AttributeValue,
}

/// Value of an element attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// String literal (`title="Hello"`).
    Literal(String),
    /// Arbitrary expression (`title={label}`), kept as source text.
    Expression(String),
    /// Array of string literals (`i18nMsg={["name", "count"]}`).
    List(Vec<String>),
    /// Attribute written without a value (`<input disabled>`).
    Flag,
}

impl AttributeValue {
    /// Returns the literal text when this is a string literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Expression(_) | Self::List(_) | Self::Flag => None,
        }
    }
}

// ============================================================================
// SECTION: Documents
// ============================================================================

/// One source unit lowered to markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupDocument {
    /// Top-level nodes in source order.
    #[serde(default)]
    pub nodes: Vec<MarkupNode>,
}
