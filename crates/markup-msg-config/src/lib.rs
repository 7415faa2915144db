// crates/markup-msg-config/src/lib.rs
// ============================================================================
// Module: markup-msg Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for markup-msg.toml semantics.
// Dependencies: markup-msg-core, serde, toml
// ============================================================================

//! ## Overview
//! `markup-msg-config` defines the configuration model for the `markup-msg`
//! tool. It provides strict, fail-closed validation and a deterministic
//! example file.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
