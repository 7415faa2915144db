// crates/markup-msg-core/src/location.rs
// ============================================================================
// Module: Source Locations
// Description: `file:line` references attached to catalog entries and errors.
// Purpose: Keep reference formatting in one place for PO output and diagnostics.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`SourceLocation`] renders as `file:line`, or just `file` when the
//! markup producer did not record a line. The same text appears in PO
//! `#:` comments and in error diagnostics.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Position of a message in a source unit.
///
/// # Invariants
/// - `file` is the unit identifier exactly as supplied by the driver.
/// - Lines are 1-based when present.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Unit identifier, usually a path relative to the project root.
    pub file: String,
    /// Line number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceLocation {
    /// Builds a location with a known line.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }

    /// Builds a location for a unit without line information.
    pub fn file_only(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// Returns a copy of this location pointing at `line`, or `self` when `line` is `None`.
    #[must_use]
    pub fn with_line(&self, line: Option<u32>) -> Self {
        Self {
            file: self.file.clone(),
            line: line.or(self.line),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => f.write_str(&self.file),
        }
    }
}
