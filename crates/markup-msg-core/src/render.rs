// crates/markup-msg-core/src/render.rs
// ============================================================================
// Module: Template Renderer
// Description: Rebuilds a concrete element tree from a parsed template.
// Purpose: Substitute element slots and expression values for one locale.
// Dependencies: crate::error, crate::parser, crate::syntax
// ============================================================================

//! ## Overview
//! Rendering walks a [`ParsedNode`] tree. Each node clones the element
//! template in `slots[node.index]` with freshly rendered children; each text
//! child has its `{name}` references replaced and its escapes removed.
//!
//! The renderer only needs one capability from the UI representation,
//! [`SlotTemplate::with_children`]. Expression values come from any
//! [`ExpressionResolver`] (maps or closures). Rendering keeps no shared
//! state, so concurrent renders never interfere.
//!
//! ### Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use markup_msg_core::render::render_text;
//!
//! let mut values = HashMap::new();
//! values.insert("count".to_string(), 5);
//! assert_eq!(render_text("{count} items", &values).unwrap(), "5 items");
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::BuildHasher;

use crate::error::TemplateError;
use crate::error::TemplateResult;
use crate::parser::ParsedChild;
use crate::parser::ParsedNode;
use crate::parser::parse;
use crate::syntax::ESCAPE;
use crate::syntax::PLACEHOLDER_CLOSE;
use crate::syntax::PLACEHOLDER_OPEN;
use crate::syntax::placeholder_at;

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// A rendered child handed to [`SlotTemplate::with_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedChild<E> {
    /// Fully substituted and unescaped text.
    Text(String),
    /// Rendered nested element.
    Element(E),
}

/// Element template that can be cloned with replacement children.
///
/// Implement this for the concrete UI element type. The returned element
/// must equal `self` except for its children.
pub trait SlotTemplate {
    /// Concrete element produced by rendering.
    type Element;

    /// Returns a copy of this template whose children are `children`.
    fn with_children(&self, children: Vec<RenderedChild<Self::Element>>) -> Self::Element;
}

/// Supplies placeholder values by name.
pub trait ExpressionResolver {
    /// Returns the stringified value for `name`, or `None` if unknown.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<V: Display, S: BuildHasher> ExpressionResolver for HashMap<String, V, S> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}

impl<V: Display> ExpressionResolver for BTreeMap<String, V> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }
}

impl<F> ExpressionResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        (self)(name)
    }
}

/// Resolver for messages without placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpressions;

impl ExpressionResolver for NoExpressions {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `root` against `slots` and `expressions`.
///
/// # Errors
/// Returns [`TemplateError::IndexOutOfRange`] when the tree references a slot
/// index not covered by `slots`, and [`TemplateError::MissingExpression`]
/// when a `{name}` reference cannot be resolved.
pub fn render<S, R>(root: &ParsedNode, slots: &[S], expressions: &R) -> TemplateResult<S::Element>
where
    S: SlotTemplate,
    R: ExpressionResolver + ?Sized,
{
    let max_index = root.max_index();
    if max_index >= slots.len() {
        return Err(TemplateError::IndexOutOfRange {
            index: max_index,
            len: slots.len(),
        });
    }
    render_node(root, slots, expressions)
}

/// Parses and renders `template` in one step.
///
/// # Errors
/// Returns any parse error from [`parse`] and any render error from [`render`].
pub fn render_template<S, R>(
    template: &str,
    slots: &[S],
    expressions: &R,
) -> TemplateResult<S::Element>
where
    S: SlotTemplate,
    R: ExpressionResolver + ?Sized,
{
    let root = parse(template)?;
    render(&root, slots, expressions)
}

/// Renders one node and its descendants.
fn render_node<S, R>(node: &ParsedNode, slots: &[S], expressions: &R) -> TemplateResult<S::Element>
where
    S: SlotTemplate,
    R: ExpressionResolver + ?Sized,
{
    let slot = slots.get(node.index).ok_or(TemplateError::IndexOutOfRange {
        index: node.index,
        len: slots.len(),
    })?;
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        let rendered = match child {
            ParsedChild::Text(text) => RenderedChild::Text(render_text(text, expressions)?),
            ParsedChild::Node(inner) => {
                RenderedChild::Element(render_node(inner, slots, expressions)?)
            }
        };
        children.push(rendered);
    }
    Ok(slot.with_children(children))
}

/// Substitutes `{name}` references and unescapes one text run.
///
/// Substitution and unescaping happen in a single pass, so substituted
/// values are inserted verbatim. A `{` that does not start a well-formed
/// reference is kept as literal text.
///
/// # Errors
/// Returns [`TemplateError::MissingExpression`] for an unresolved reference.
pub fn render_text<R>(text: &str, expressions: &R) -> TemplateResult<String>
where
    R: ExpressionResolver + ?Sized,
{
    let mut out = String::with_capacity(text.len());
    let mut offset = 0;
    while let Some(ch) = text[offset ..].chars().next() {
        offset += ch.len_utf8();
        if ch == ESCAPE {
            match text[offset ..].chars().next() {
                Some(next) => {
                    out.push(next);
                    offset += next.len_utf8();
                }
                None => out.push(ESCAPE),
            }
        } else if ch == PLACEHOLDER_OPEN
            && let Some(name) = placeholder_at(&text[offset ..])
        {
            let value = expressions.resolve(name).ok_or_else(|| {
                TemplateError::MissingExpression {
                    name: name.to_string(),
                }
            })?;
            out.push_str(&value);
            offset += name.len() + PLACEHOLDER_CLOSE.len_utf8();
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}
