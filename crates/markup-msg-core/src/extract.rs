// crates/markup-msg-core/src/extract.rs
// ============================================================================
// Module: Message Extractor
// Description: Turns a markup subtree into a template plus its slot arrays.
// Purpose: Produce exactly the inputs the renderer needs to rebuild the subtree.
// Dependencies: crate::error, crate::message_id, crate::syntax
// ============================================================================

//! ## Overview
//! [`extract_message`] walks the children of a markup node depth-first,
//! pre-order, with one running index shared by all sibling subtrees:
//! - text is appended with `[`, `]`, `\` escaped;
//! - a nested element takes the next index, its stripped template is pushed
//!   to `elements`, and its children become `[<index>:<inner>]`;
//! - an expression slot takes the next placeholder name by position, its
//!   reference is pushed to `expressions`, and `{<name>}` is emitted.
//!
//! Slot `k` of the renderer is `elements[k - 1]`; slot `0` is the stripped
//! message root supplied by the caller.
//!
//! Whitespace normalization collapses interior runs while composing. An
//! element that preserves whitespace (see
//! [`MarkupTree::preserves_whitespace`] and
//! [`ExtractOptions::preserve_whitespace_tags`]) keeps its subtree verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::TemplateError;
use crate::error::TemplateResult;
use crate::message_id::shrink_whitespace_edges;
use crate::message_id::split_whitespace_edges;
use crate::syntax::CLOSE_ELEMENT;
use crate::syntax::ESCAPE;
use crate::syntax::INDEX_SEPARATOR;
use crate::syntax::OPEN_ELEMENT;
use crate::syntax::PLACEHOLDER_OPEN;
use crate::syntax::is_placeholder_name;
use crate::syntax::is_reserved;
use crate::syntax::placeholder;
use crate::syntax::placeholder_at;

// ============================================================================
// SECTION: Markup Contract
// ============================================================================

/// A child of a markup node, classified for extraction.
pub enum MarkupChild<'a, T: MarkupTree> {
    /// Literal text.
    Text(&'a str),
    /// Nested element.
    Element(&'a T),
    /// Expression slot.
    Expression(&'a T::Expression),
}

/// Markup node the extractor can walk.
pub trait MarkupTree: Sized {
    /// Element template produced by [`MarkupTree::strip`].
    type Stripped;
    /// Reference to an expression slot's value-producing code.
    type Expression: Clone;

    /// Element name, used for per-tag whitespace policy.
    fn tag(&self) -> &str;

    /// Children in document order.
    fn children(&self) -> Vec<MarkupChild<'_, Self>>;

    /// Copy of this element's tag and attributes with no children.
    fn strip(&self) -> Self::Stripped;

    /// Returns true when whitespace inside this element must be kept verbatim.
    fn preserves_whitespace(&self) -> bool {
        false
    }
}

// ============================================================================
// SECTION: Options and Output
// ============================================================================

/// Extraction settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions<'a> {
    /// Collapse whitespace runs and trim surrounding whitespace to one space.
    pub normalize_whitespace: bool,
    /// Element tags whose content keeps its whitespace (`pre`, `textarea`, ...).
    pub preserve_whitespace_tags: &'a [String],
    /// Accept more names than expression slots instead of failing.
    pub allow_unused_placeholders: bool,
}

/// Result of extracting one message.
///
/// # Invariants
/// - `format` contains element indices `1..=elements.len()` in first-use order.
/// - `expressions[i]` is bound to the `i`-th placeholder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage<S, E> {
    /// Template text; also the catalog id.
    pub format: String,
    /// Whitespace removed before the template.
    pub leading_ws: String,
    /// Whitespace removed after the template.
    pub trailing_ws: String,
    /// Stripped element templates; slot `k` is `elements[k - 1]`.
    pub elements: Vec<S>,
    /// Expression references in placeholder order.
    pub expressions: Vec<E>,
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts the template for the children of `node`.
///
/// `placeholder_names` names the expression slots of the message in
/// document order.
///
/// # Errors
/// - [`TemplateError::IndexOutOfRange`] when there are more expression slots
///   than names.
/// - [`TemplateError::UnusedPlaceholder`] when names are left over. A
///   leftover name usually means an expression was deleted while its name
///   stayed in the attribute, so this is rejected unless
///   [`ExtractOptions::allow_unused_placeholders`] is set.
/// - [`TemplateError::DuplicatePlaceholder`] or
///   [`TemplateError::InvalidPlaceholderName`] for unusable names.
pub fn extract_message<T, N>(
    node: &T,
    placeholder_names: &[N],
    normalize_whitespace: bool,
) -> TemplateResult<ExtractedMessage<T::Stripped, T::Expression>>
where
    T: MarkupTree,
    N: AsRef<str>,
{
    let options = ExtractOptions {
        normalize_whitespace,
        preserve_whitespace_tags: &[],
        allow_unused_placeholders: false,
    };
    extract_message_with(node, placeholder_names, &options)
}

/// Extracts the template for the children of `node` using `options`.
///
/// # Errors
/// Same as [`extract_message`].
pub fn extract_message_with<T, N>(
    node: &T,
    placeholder_names: &[N],
    options: &ExtractOptions<'_>,
) -> TemplateResult<ExtractedMessage<T::Stripped, T::Expression>>
where
    T: MarkupTree,
    N: AsRef<str>,
{
    let names = validate_placeholder_names(placeholder_names)?;
    let mut extractor = Extractor {
        names: &names,
        options,
        elements: Vec::new(),
        expressions: Vec::new(),
    };

    let collapse = options.normalize_whitespace && !extractor.preserves(node);
    let mut format = String::new();
    extractor.compose(node, collapse, &mut format)?;

    if let Some(unused) = names.get(extractor.expressions.len())
        && !options.allow_unused_placeholders
    {
        return Err(TemplateError::UnusedPlaceholder {
            name: (*unused).to_string(),
        });
    }

    let mut split = split_whitespace_edges(&format);
    if collapse {
        shrink_whitespace_edges(&mut split);
    }

    Ok(ExtractedMessage {
        format: split.id,
        leading_ws: split.leading_ws,
        trailing_ws: split.trailing_ws,
        elements: extractor.elements,
        expressions: extractor.expressions,
    })
}

/// Checks placeholder names for syntax and uniqueness.
fn validate_placeholder_names<N: AsRef<str>>(names: &[N]) -> TemplateResult<Vec<&str>> {
    let mut seen: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !is_placeholder_name(name) {
            return Err(TemplateError::InvalidPlaceholderName {
                name: name.to_string(),
            });
        }
        if seen.contains(&name) {
            return Err(TemplateError::DuplicatePlaceholder {
                name: name.to_string(),
            });
        }
        seen.push(name);
    }
    Ok(seen)
}

/// Walk state shared across the whole message.
struct Extractor<'a, T: MarkupTree> {
    /// Placeholder names in slot order.
    names: &'a [&'a str],
    /// Extraction settings.
    options: &'a ExtractOptions<'a>,
    /// Stripped element templates in index order.
    elements: Vec<T::Stripped>,
    /// Expression references in placeholder order.
    expressions: Vec<T::Expression>,
}

impl<T: MarkupTree> Extractor<'_, T> {
    /// Returns true when `element` opts out of whitespace normalization.
    fn preserves(&self, element: &T) -> bool {
        element.preserves_whitespace()
            || self.options.preserve_whitespace_tags.iter().any(|tag| tag == element.tag())
    }

    /// Appends the template for the children of `node` to `out`.
    ///
    /// Consecutive text children are escaped as one run so a reference split
    /// across them still gets its brace escaped.
    fn compose(&mut self, node: &T, collapse: bool, out: &mut String) -> TemplateResult<()> {
        let mut run = String::new();
        for child in node.children() {
            match child {
                MarkupChild::Text(text) => run.push_str(text),
                MarkupChild::Element(element) => {
                    push_text(out, &std::mem::take(&mut run), collapse);
                    self.elements.push(element.strip());
                    let index = self.elements.len();
                    out.push(OPEN_ELEMENT);
                    out.push_str(&index.to_string());
                    out.push(INDEX_SEPARATOR);
                    let inner_collapse = collapse && !self.preserves(element);
                    self.compose(element, inner_collapse, out)?;
                    out.push(CLOSE_ELEMENT);
                }
                MarkupChild::Expression(expression) => {
                    push_text(out, &std::mem::take(&mut run), collapse);
                    let position = self.expressions.len();
                    let name = self.names.get(position).ok_or(TemplateError::IndexOutOfRange {
                        index: position,
                        len: self.names.len(),
                    })?;
                    self.expressions.push(expression.clone());
                    out.push_str(&placeholder(name));
                }
            }
        }
        push_text(out, &run, collapse);
        Ok(())
    }
}

/// Appends escaped `text`, collapsing whitespace runs when `collapse` is set.
///
/// A literal `{name}` in the text gets its brace escaped so rendering does
/// not mistake it for a placeholder.
fn push_text(out: &mut String, text: &str, collapse: bool) {
    for (offset, ch) in text.char_indices() {
        if collapse && ch.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
            continue;
        }
        let literal_brace = ch == PLACEHOLDER_OPEN
            && placeholder_at(&text[offset + ch.len_utf8() ..]).is_some();
        if is_reserved(ch) || literal_brace {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}
