// crates/markup-msg-cli/src/lib.rs
// ============================================================================
// Module: markup-msg CLI Library
// Description: Shared helpers for the markup-msg command-line interface.
// Purpose: Provide reusable components (i18n, audit sinks) for the CLI binary and tests.
// Dependencies: serde, serde_json, markup-msg-core.
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the internationalized
//! message catalog and the JSON-lines extraction audit log. The binary entry
//! point (`src/main.rs`) imports these helpers to keep all user-facing output
//! consistent.
//!
//! Security posture: CLI inputs are untrusted and must be validated before
//! they reach the extractor.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured extraction audit events and sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
