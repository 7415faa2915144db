// crates/markup-msg-core/src/message_id.rs
// ============================================================================
// Module: Message Identity
// Description: Canonical catalog keys derived from raw source text.
// Purpose: Trim and optionally collapse whitespace so equivalent text shares one id.
// Dependencies: None
// ============================================================================

//! ## Overview
//! Source text usually carries layout whitespace that translators should not
//! see. [`compute_message_id`] splits text into leading whitespace, the
//! canonical id, and trailing whitespace. Callers translate the id and glue
//! the surrounding whitespace back on with [`MessageId::wrap`].
//!
//! With normalization enabled, interior whitespace runs collapse to one space
//! and non-empty leading/trailing runs shrink to a single space.

/// Text split around its canonical message id.
///
/// # Invariants
/// - `id` has no leading or trailing whitespace.
/// - Without normalization, `leading_ws + id + trailing_ws` equals the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageId {
    /// Whitespace before the id.
    pub leading_ws: String,
    /// Canonical lookup key.
    pub id: String,
    /// Whitespace after the id.
    pub trailing_ws: String,
}

impl MessageId {
    /// Returns true when the text had no translatable content.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Surrounds `translated` with the original leading and trailing whitespace.
    #[must_use]
    pub fn wrap(&self, translated: &str) -> String {
        let mut out =
            String::with_capacity(self.leading_ws.len() + translated.len() + self.trailing_ws.len());
        out.push_str(&self.leading_ws);
        out.push_str(translated);
        out.push_str(&self.trailing_ws);
        out
    }
}

/// Computes the canonical id for `text`.
///
/// Whitespace-only text yields an empty id with all of its whitespace in
/// `leading_ws`.
#[must_use]
pub fn compute_message_id(text: &str, normalize_whitespace: bool) -> MessageId {
    let mut message = split_whitespace_edges(text);
    if normalize_whitespace {
        message.id = collapse_whitespace(&message.id);
        shrink_whitespace_edges(&mut message);
    }
    message
}

/// Splits leading and trailing whitespace off `text` without touching the interior.
pub(crate) fn split_whitespace_edges(text: &str) -> MessageId {
    let after_leading = text.trim_start();
    let leading = &text[.. text.len() - after_leading.len()];
    let core = after_leading.trim_end();
    let trailing = &after_leading[core.len() ..];
    MessageId {
        leading_ws: leading.to_string(),
        id: core.to_string(),
        trailing_ws: trailing.to_string(),
    }
}

/// Shrinks non-empty leading and trailing whitespace to a single space.
pub(crate) fn shrink_whitespace_edges(message: &mut MessageId) {
    message.leading_ws = single_space_if_any(&message.leading_ws);
    message.trailing_ws = single_space_if_any(&message.trailing_ws);
}

/// Replaces every run of whitespace with a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Maps a whitespace run to `" "`, or `""` when it is empty.
fn single_space_if_any(run: &str) -> String {
    if run.is_empty() { String::new() } else { " ".to_string() }
}
