// crates/markup-msg-core/src/error.rs
// ============================================================================
// Module: Template Error Definitions
// Description: Structured diagnostics for template parsing, rendering, and extraction.
// Purpose: Give every failure a stable variant plus the context needed to act on it.
// Dependencies: thiserror, crate::location
// ============================================================================

//! ## Overview
//! Template failures fall into three groups: malformed template text
//! ([`TemplateError::Syntax`]), slot mismatches between a template and the
//! values supplied for it ([`TemplateError::IndexOutOfRange`],
//! [`TemplateError::MissingExpression`] and the placeholder variants), and
//! resource limits. None of them are transient; callers decide whether a
//! failure skips one message or aborts a whole catalog build.
//! [`LocatedError`] attaches the source location and message id so a
//! diagnostic can point back at the offending markup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::location::SourceLocation;

// ============================================================================
// SECTION: Syntax Error Kinds
// ============================================================================

/// Classification of malformed template text.
///
/// # Invariants
/// - Variants are stable so callers can match on them instead of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// `[` was not followed by one or more digits and `:`.
    ExpectedElementIndex,
    /// The element index does not fit in a `usize`.
    ElementIndexOverflow,
    /// Element index `0` names the message root and cannot be referenced.
    ReservedElementIndex,
    /// A backslash ended the template with nothing left to escape.
    DanglingEscape,
    /// Opening and closing brackets do not balance.
    UnmatchedElements,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ExpectedElementIndex => "expected element index",
            Self::ElementIndexOverflow => "element index out of range",
            Self::ReservedElementIndex => "element index 0 is reserved for the message root",
            Self::DanglingEscape => "dangling escape at end of template",
            Self::UnmatchedElements => "unmatched opening and closing elements",
        };
        f.write_str(text)
    }
}

// ============================================================================
// SECTION: Template Errors
// ============================================================================

/// Errors raised by the tokenizer, parser, renderer, and extractor.
///
/// # Invariants
/// - `position` fields are byte offsets into the template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template text is malformed.
    #[error("syntax error at byte {position}: {kind}")]
    Syntax {
        /// What went wrong.
        kind: SyntaxErrorKind,
        /// Byte offset of the offending character.
        position: usize,
    },
    /// A template or markup node referenced a slot that does not exist.
    #[error("slot index {index} out of range ({len} available)")]
    IndexOutOfRange {
        /// Requested slot index.
        index: usize,
        /// Number of slots that were supplied.
        len: usize,
    },
    /// A `{name}` reference had no supplied value.
    #[error("missing expression `{name}`")]
    MissingExpression {
        /// Placeholder name without braces.
        name: String,
    },
    /// A declared placeholder name was never bound to an expression slot.
    #[error("placeholder `{name}` has no matching expression slot")]
    UnusedPlaceholder {
        /// Placeholder name that was left over.
        name: String,
    },
    /// The same placeholder name was declared twice for one message.
    #[error("placeholder `{name}` is declared more than once")]
    DuplicatePlaceholder {
        /// Repeated placeholder name.
        name: String,
    },
    /// A placeholder name cannot be written as a `{name}` reference.
    #[error("placeholder name `{name}` must be non-empty and use only [A-Za-z0-9_]")]
    InvalidPlaceholderName {
        /// Rejected placeholder name.
        name: String,
    },
    /// A message attribute's value cannot be read as a list of placeholder names.
    #[error("attribute `{attribute}` must be a string literal or a list of strings")]
    InvalidPlaceholderList {
        /// Name of the message attribute.
        attribute: String,
    },
    /// Elements are nested deeper than the parser allows.
    #[error("template nesting exceeds limit: depth {actual_depth} (max {max_depth}) at byte {position}")]
    TooDeep {
        /// Maximum allowed depth.
        max_depth: usize,
        /// Depth reached when the limit tripped.
        actual_depth: usize,
        /// Byte offset of the opening bracket that tripped the limit.
        position: usize,
    },
    /// Template text is larger than the parser accepts.
    #[error("template exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual template length in bytes.
        actual_bytes: usize,
    },
}

impl TemplateError {
    /// Builds a syntax error at `position`.
    #[must_use]
    pub const fn syntax(kind: SyntaxErrorKind, position: usize) -> Self {
        Self::Syntax {
            kind,
            position,
        }
    }

    /// Returns a stable label for audit logs and metrics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Syntax {
                ..
            } => "syntax",
            Self::IndexOutOfRange {
                ..
            } => "index_out_of_range",
            Self::MissingExpression {
                ..
            } => "missing_expression",
            Self::UnusedPlaceholder {
                ..
            } => "unused_placeholder",
            Self::DuplicatePlaceholder {
                ..
            } => "duplicate_placeholder",
            Self::InvalidPlaceholderName {
                ..
            } => "invalid_placeholder_name",
            Self::InvalidPlaceholderList {
                ..
            } => "invalid_placeholder_list",
            Self::TooDeep {
                ..
            } => "too_deep",
            Self::TooLarge {
                ..
            } => "too_large",
        }
    }

    /// Attaches a source location (and optionally the message id) to this error.
    #[must_use]
    pub fn at(self, location: SourceLocation, message_id: Option<String>) -> LocatedError {
        LocatedError {
            location,
            message_id,
            error: self,
        }
    }
}

/// Convenient Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

// ============================================================================
// SECTION: Located Errors
// ============================================================================

/// A template error tied to the markup that produced it.
///
/// # Invariants
/// - `message_id` is `None` only when the failure happened before an id existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedError {
    /// Where the failing message was found.
    pub location: SourceLocation,
    /// Message id (or raw format string) involved, when known.
    pub message_id: Option<String>,
    /// Underlying failure.
    pub error: TemplateError,
}

impl fmt::Display for LocatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message_id {
            Some(id) => write!(f, "{}: {} (message \"{id}\")", self.location, self.error),
            None => write!(f, "{}: {}", self.location, self.error),
        }
    }
}

impl std::error::Error for LocatedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
