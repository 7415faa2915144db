// crates/markup-msg-core/src/syntax.rs
// ============================================================================
// Module: Template Grammar Primitives
// Description: Reserved characters, escaping, and placeholder name rules.
// Purpose: Share one definition of the grammar between extraction and rendering.
// Dependencies: None
// ============================================================================

//! ## Overview
//! Message templates reserve three characters: `[` opens an element
//! reference, `]` closes it, and `\` escapes the next character. Literal
//! text is stored with those three characters escaped; [`unescape`] reverses
//! [`escape`] exactly. Placeholders are written `{name}` where `name` is one
//! or more ASCII alphanumerics or underscores.
//!
//! ### Example
//!
//! ```
//! use markup_msg_core::syntax::escape;
//! use markup_msg_core::syntax::unescape;
//!
//! let escaped = escape("a [b] \\ c");
//! assert_eq!(escaped, "a \\[b\\] \\\\ c");
//! assert_eq!(unescape(&escaped), "a [b] \\ c");
//! ```

// ============================================================================
// SECTION: Reserved Characters
// ============================================================================

/// Opens an element reference (`[1:...]`).
pub const OPEN_ELEMENT: char = '[';
/// Closes an element reference.
pub const CLOSE_ELEMENT: char = ']';
/// Separates the element index from its inner template.
pub const INDEX_SEPARATOR: char = ':';
/// Escapes the following character.
pub const ESCAPE: char = '\\';
/// Opens a placeholder reference (`{name}`).
pub const PLACEHOLDER_OPEN: char = '{';
/// Closes a placeholder reference.
pub const PLACEHOLDER_CLOSE: char = '}';

/// Returns true when `ch` must be escaped inside literal template text.
#[must_use]
pub const fn is_reserved(ch: char) -> bool {
    matches!(ch, OPEN_ELEMENT | CLOSE_ELEMENT | ESCAPE)
}

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes `[`, `]`, and `\` so `text` can be embedded in a template.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Appends `text` to `out` with reserved characters escaped.
pub fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if is_reserved(ch) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}

/// Replaces every `\X` pair with `X`.
///
/// A trailing lone backslash is kept as-is; the tokenizer rejects such
/// templates before they reach rendering.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push(ESCAPE),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

// ============================================================================
// SECTION: Placeholder Names
// ============================================================================

/// Returns true for characters allowed in a placeholder name.
#[must_use]
pub const fn is_placeholder_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Returns true when `name` can be written as a `{name}` reference.
#[must_use]
pub fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_placeholder_char)
}

/// Returns the placeholder name when `rest`, the text after a `{`, starts with `name}`.
#[must_use]
pub fn placeholder_at(rest: &str) -> Option<&str> {
    let end = rest.find(PLACEHOLDER_CLOSE)?;
    let name = &rest[.. end];
    is_placeholder_name(name).then_some(name)
}

/// Formats `name` as a placeholder reference.
#[must_use]
pub fn placeholder(name: &str) -> String {
    format!("{PLACEHOLDER_OPEN}{name}{PLACEHOLDER_CLOSE}")
}
