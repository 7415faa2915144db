// crates/markup-msg-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and markup builders for template integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for Result-based assertions and compact markup
//! construction.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Shared test helpers may be unused in some test binaries.")]

use std::error::Error;
use std::fmt;

use markup_msg_core::AttributeValue;
use markup_msg_core::MarkupElement;
use markup_msg_core::MarkupNode;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across template integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Markup Builders
// ========================================================================

/// Builds an element with the given children.
pub fn element(tag: &str, children: Vec<MarkupNode>) -> MarkupElement {
    children.into_iter().fold(MarkupElement::new(tag), |parent, child| parent.with_child(child))
}

/// Builds a text node.
pub fn text(value: &str) -> MarkupNode {
    MarkupNode::text(value)
}

/// Builds an expression slot node.
pub fn expr(source: &str) -> MarkupNode {
    MarkupNode::expression(source)
}

/// Builds a string literal attribute value.
pub fn literal(value: &str) -> AttributeValue {
    AttributeValue::Literal(value.to_string())
}
