// crates/markup-msg-core/src/scan.rs
// ============================================================================
// Module: Unit Scanner
// Description: Walks one markup document and collects its translatable messages.
// Purpose: Produce the partial catalog for a single source unit.
// Dependencies: serde, crate::{catalog, extract, markup, message_id}
// ============================================================================

//! ## Overview
//! [`scan_unit`] visits the nodes of one unit depth-first:
//! - elements in the blacklist, or carrying the language attribute, are
//!   skipped with their subtree;
//! - an element carrying the message attribute becomes one complex message
//!   built by [`extract_message_with`], and its subtree is not visited
//!   further;
//! - otherwise each non-blank text child and each non-blank literal value of
//!   a translatable attribute becomes a simple message.
//!
//! Every message is recorded at the nearest known `file:line`. A unit scan
//! touches nothing outside its own report, so units can be scanned on
//! separate threads and merged afterwards with
//! [`merge_units`](crate::catalog::merge_units).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::catalog::UnitCatalog;
use crate::error::LocatedError;
use crate::error::TemplateError;
use crate::extract::ExtractOptions;
use crate::extract::extract_message_with;
use crate::location::SourceLocation;
use crate::markup::AttributeValue;
use crate::markup::MarkupElement;
use crate::markup::MarkupNode;
use crate::message_id::compute_message_id;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Attribute that turns an element into a complex message.
pub const DEFAULT_MESSAGE_ATTRIBUTE: &str = "i18nMsg";
/// Attribute carrying the developer comment for a complex message.
pub const DEFAULT_COMMENT_ATTRIBUTE: &str = "i18nComment";
/// Attribute marking content that is already in a specific language.
pub const DEFAULT_LANG_ATTRIBUTE: &str = "lang";
/// Attributes whose literal values are translated.
pub const DEFAULT_TRANSLATABLE_ATTRIBUTES: &[&str] = &["alt", "placeholder", "title"];
/// Elements never scanned.
pub const DEFAULT_ELEMENT_BLACKLIST: &[&str] = &["style", "code"];
/// Elements whose whitespace is kept verbatim.
pub const DEFAULT_PRESERVE_WHITESPACE_ELEMENTS: &[&str] = &["pre", "textarea"];

// ============================================================================
// SECTION: Options
// ============================================================================

/// What to do when one message cannot be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Drop the failing message and keep a diagnostic.
    SkipMessage,
}

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Collapse whitespace in message ids.
    pub normalize_whitespace: bool,
    /// Attribute that marks a complex message.
    pub message_attribute: String,
    /// Attribute holding the developer comment.
    pub comment_attribute: String,
    /// Attribute that excludes an element subtree.
    pub lang_attribute: String,
    /// Attributes whose literal values are messages.
    pub translatable_attributes: Vec<String>,
    /// Element tags excluded with their subtree.
    pub element_blacklist: Vec<String>,
    /// Element tags whose whitespace is not normalized.
    pub preserve_whitespace_elements: Vec<String>,
    /// Accept placeholder names that no expression slot uses.
    pub allow_unused_placeholders: bool,
    /// Failure handling.
    pub on_error: ErrorPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            message_attribute: DEFAULT_MESSAGE_ATTRIBUTE.to_string(),
            comment_attribute: DEFAULT_COMMENT_ATTRIBUTE.to_string(),
            lang_attribute: DEFAULT_LANG_ATTRIBUTE.to_string(),
            translatable_attributes: to_strings(DEFAULT_TRANSLATABLE_ATTRIBUTES),
            element_blacklist: to_strings(DEFAULT_ELEMENT_BLACKLIST),
            preserve_whitespace_elements: to_strings(DEFAULT_PRESERVE_WHITESPACE_ELEMENTS),
            allow_unused_placeholders: false,
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Converts a static list into owned strings.
fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Result of scanning one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    /// Unit identifier.
    pub unit: String,
    /// Messages found in the unit.
    pub catalog: Catalog,
    /// Messages dropped under [`ErrorPolicy::SkipMessage`].
    pub diagnostics: Vec<LocatedError>,
}

impl UnitReport {
    /// Returns the partial catalog for merging.
    #[must_use]
    pub fn into_unit_catalog(self) -> UnitCatalog {
        UnitCatalog {
            unit: self.unit,
            catalog: self.catalog,
        }
    }
}

// ============================================================================
// SECTION: Scanning
// ============================================================================

/// Scans the top-level `nodes` of unit `unit_id`.
///
/// # Errors
/// Under [`ErrorPolicy::Abort`], returns the first [`LocatedError`]. Under
/// [`ErrorPolicy::SkipMessage`] this never fails; failures are listed in
/// [`UnitReport::diagnostics`].
pub fn scan_unit(
    unit_id: &str,
    nodes: &[MarkupNode],
    options: &ScanOptions,
) -> Result<UnitReport, LocatedError> {
    let mut scanner = Scanner {
        options,
        origin: SourceLocation::file_only(unit_id),
        catalog: Catalog::new(),
        diagnostics: Vec::new(),
    };
    scanner.visit_children(nodes, None, options.normalize_whitespace)?;
    Ok(UnitReport {
        unit: unit_id.to_string(),
        catalog: scanner.catalog,
        diagnostics: scanner.diagnostics,
    })
}

/// Walk state for one unit.
struct Scanner<'a> {
    /// Scanner settings.
    options: &'a ScanOptions,
    /// Location of the unit without a line.
    origin: SourceLocation,
    /// Messages collected so far.
    catalog: Catalog,
    /// Failures kept under [`ErrorPolicy::SkipMessage`].
    diagnostics: Vec<LocatedError>,
}

impl Scanner<'_> {
    /// Visits sibling nodes; `line` is the enclosing element's line.
    fn visit_children(
        &mut self,
        nodes: &[MarkupNode],
        line: Option<u32>,
        normalize: bool,
    ) -> Result<(), LocatedError> {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => {
                    let message = compute_message_id(&text.value, normalize);
                    if !message.is_empty() {
                        let location = self.origin.with_line(text.line.or(line));
                        self.catalog.add_message(&message.id, location, None);
                    }
                }
                MarkupNode::Element(element) => self.visit_element(element, line, normalize)?,
                MarkupNode::Expression(_) => {}
            }
        }
        Ok(())
    }

    /// Visits one element and, unless it is a message root, its subtree.
    fn visit_element(
        &mut self,
        element: &MarkupElement,
        inherited_line: Option<u32>,
        normalize: bool,
    ) -> Result<(), LocatedError> {
        if self.options.element_blacklist.contains(&element.tag)
            || element.has_attribute(&self.options.lang_attribute)
        {
            return Ok(());
        }
        let line = element.line.or(inherited_line);
        let normalize = normalize && !self.preserves(element);

        if let Some(attribute) = element.attribute(&self.options.message_attribute) {
            let location = self.origin.with_line(line);
            return match self.complex_message(element, &attribute.value, normalize) {
                Ok(Some(id)) => {
                    let comment = element
                        .attribute(&self.options.comment_attribute)
                        .and_then(|comment| comment.value.as_literal());
                    self.catalog.add_message(&id, location, comment);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(error) => self.fail(error.at(location, None)),
            };
        }

        for attribute in &element.attributes {
            if !self.options.translatable_attributes.contains(&attribute.name) {
                continue;
            }
            if let Some(value) = attribute.value.as_literal() {
                let message = compute_message_id(value, normalize);
                if !message.is_empty() {
                    self.catalog.add_message(&message.id, self.origin.with_line(line), None);
                }
            }
        }
        self.visit_children(&element.children, line, normalize)
    }

    /// Extracts the message rooted at `element`; `None` when it has no text.
    fn complex_message(
        &self,
        element: &MarkupElement,
        names: &AttributeValue,
        normalize: bool,
    ) -> Result<Option<String>, TemplateError> {
        let names = placeholder_names(&self.options.message_attribute, names)?;
        let extract_options = ExtractOptions {
            normalize_whitespace: normalize,
            preserve_whitespace_tags: &self.options.preserve_whitespace_elements,
            allow_unused_placeholders: self.options.allow_unused_placeholders,
        };
        let extracted = extract_message_with(element, &names, &extract_options)?;
        Ok((!extracted.format.is_empty()).then_some(extracted.format))
    }

    /// Returns true when `element` keeps its whitespace.
    fn preserves(&self, element: &MarkupElement) -> bool {
        element.preserve_whitespace || self.options.preserve_whitespace_elements.contains(&element.tag)
    }

    /// Applies the error policy to one failed message.
    fn fail(&mut self, error: LocatedError) -> Result<(), LocatedError> {
        match self.options.on_error {
            ErrorPolicy::Abort => Err(error),
            ErrorPolicy::SkipMessage => {
                self.diagnostics.push(error);
                Ok(())
            }
        }
    }
}

/// Reads placeholder names from a message attribute value.
///
/// A literal is split on commas with surrounding whitespace trimmed; an
/// empty or blank literal and a bare flag declare no names.
///
/// # Errors
/// Returns [`TemplateError::InvalidPlaceholderList`] for expression values.
pub fn placeholder_names(attribute: &str, value: &AttributeValue) -> Result<Vec<String>, TemplateError> {
    match value {
        AttributeValue::Literal(text) if text.trim().is_empty() => Ok(Vec::new()),
        AttributeValue::Literal(text) => {
            Ok(text.split(',').map(|name| name.trim().to_string()).collect())
        }
        AttributeValue::List(names) => Ok(names.clone()),
        AttributeValue::Flag => Ok(Vec::new()),
        AttributeValue::Expression(_) => Err(TemplateError::InvalidPlaceholderList {
            attribute: attribute.to_string(),
        }),
    }
}
