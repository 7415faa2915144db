// crates/markup-msg-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads, time resolution, and extraction helpers.
// Purpose: Ensure CLI helpers fail closed and stay deterministic.
// Dependencies: markup-msg-cli main helpers, proptest, tempfile
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit`, creation time resolution, locale
//! resolution, and the parallel scan and merge helpers used by `extract`.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use markup_msg_cli::audit::NoopAuditSink;
use markup_msg_cli::i18n::Locale;
use markup_msg_core::CommentMergePolicy;
use markup_msg_core::ErrorPolicy;
use markup_msg_core::ScanOptions;
use markup_msg_core::merge_units;
use proptest::prelude::*;
use serde_json::json;
use time::OffsetDateTime;

use super::LangArg;
use super::ReadLimitError;
use super::UnitFailure;
use super::collect_units;
use super::expression_text;
use super::read_bytes_with_limit;
use super::resolve_creation_time;
use super::resolve_locale;
use super::scan_inputs;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a markup document with one paragraph per message.
fn write_document(dir: &tempfile::TempDir, name: &str, messages: &[&str]) -> PathBuf {
    let nodes: Vec<_> = messages
        .iter()
        .enumerate()
        .map(|(line, text)| {
            json!({ "kind": "element", "tag": "p", "line": line + 1,
                    "children": [{ "kind": "text", "value": text }] })
        })
        .collect();
    let path = dir.path().join(name);
    fs::write(&path, json!({ "nodes": nodes }).to_string()).unwrap();
    path
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_allows_small_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.bin");
    fs::write(&path, b"ok").unwrap();
    let bytes = read_bytes_with_limit(&path, 16).expect("read small file");
    assert_eq!(bytes, b"ok");
}

#[test]
fn read_bytes_with_limit_rejects_large_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large.bin");
    let limit = 8_usize;
    fs::write(&path, vec![0_u8; limit + 1]).unwrap();

    let err = read_bytes_with_limit(&path, limit).expect_err("expected size limit failure");
    match err {
        ReadLimitError::TooLarge {
            size,
            limit: reported,
        } => {
            assert_eq!(size, 9);
            assert_eq!(reported, limit);
        }
        ReadLimitError::Io(err) => panic!("unexpected IO error: {err}"),
    }
}

#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_bytes_with_limit(&dir.path().join("absent"), 8).expect_err("missing file");
    assert!(matches!(err, ReadLimitError::Io(_)));
}

// ============================================================================
// SECTION: Creation Time and Locale
// ============================================================================

#[test]
fn explicit_creation_date_wins() {
    let created = resolve_creation_time(Some("2024-03-01T12:30:00Z"), Some("0")).unwrap();
    assert_eq!(created.unix_timestamp(), 1_709_296_200);
}

#[test]
fn source_date_epoch_is_used_without_flag() {
    let created = resolve_creation_time(None, Some(" 1709296200 ")).unwrap();
    assert_eq!(created.unix_timestamp(), 1_709_296_200);
}

#[test]
fn invalid_creation_inputs_are_rejected() {
    assert!(resolve_creation_time(Some("yesterday"), None).is_err());
    let err = resolve_creation_time(None, Some("soon")).unwrap_err();
    assert!(err.to_string().contains("SOURCE_DATE_EPOCH"));
}

#[test]
fn creation_time_defaults_to_now() {
    let before = OffsetDateTime::now_utc().unix_timestamp();
    let created = resolve_creation_time(None, None).unwrap();
    assert!(created.unix_timestamp() >= before);
}

#[test]
fn resolve_locale_prefers_flag_then_env() {
    assert_eq!(resolve_locale(Some(LangArg::Ca), Some("en")).unwrap(), Locale::Ca);
    assert_eq!(resolve_locale(None, Some("ca-ES")).unwrap(), Locale::Ca);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
    assert!(resolve_locale(None, Some("xx")).is_err());
}

proptest! {
    #[test]
    fn source_date_epoch_round_trips(seconds in 0_i64 .. 4_102_444_800) {
        let created = resolve_creation_time(None, Some(seconds.to_string().as_str())).unwrap();
        prop_assert_eq!(created.unix_timestamp(), seconds);
    }
}

// ============================================================================
// SECTION: Extraction Helpers
// ============================================================================

#[test]
fn expression_text_unquotes_strings() {
    assert_eq!(expression_text(&json!("Ada")), "Ada");
    assert_eq!(expression_text(&json!(3)), "3");
    assert_eq!(expression_text(&json!(null)), "");
}

#[test]
fn scan_inputs_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = (0 .. 6)
        .map(|index| write_document(&dir, &format!("unit-{index}.json"), &[format!("Message {index}").as_str()]))
        .collect();
    let outcomes = scan_inputs(&inputs, &ScanOptions::default(), 1024 * 1024).unwrap();
    let units: Vec<String> = outcomes.iter().map(|outcome| outcome.unit.clone()).collect();
    let expected: Vec<String> = inputs.iter().map(|path| path.display().to_string()).collect();
    assert_eq!(units, expected);
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));
}

#[test]
fn merged_catalog_is_independent_of_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_document(&dir, "a.json", &["Shared", "Only A"]);
    let second = write_document(&dir, "b.json", &["Only B", "Shared"]);
    let build = |inputs: Vec<PathBuf>| {
        let outcomes = scan_inputs(&inputs, &ScanOptions::default(), 1024 * 1024).unwrap();
        let units = collect_units(outcomes, &NoopAuditSink).unwrap();
        let catalog = merge_units(units, CommentMergePolicy::KeepFirst);
        catalog.ids().map(ToString::to_string).collect::<Vec<_>>()
    };
    let forward = build(vec![first.clone(), second.clone()]);
    let backward = build(vec![second, first]);
    assert_eq!(forward, vec!["Shared", "Only A", "Only B"]);
    assert_eq!(forward, backward);
}

#[test]
fn oversized_input_is_an_input_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(&dir, "big.json", &["Hello"]);
    let outcomes = scan_inputs(&[path], &ScanOptions::default(), 8).unwrap();
    assert!(matches!(outcomes[0].result, Err(UnitFailure::Input(_))));
    let err = collect_units(outcomes, &NoopAuditSink).unwrap_err();
    assert!(err.to_string().contains("limit 8"));
}

#[test]
fn skip_policy_keeps_valid_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    let document = json!({ "nodes": [
        { "kind": "element", "tag": "p", "line": 1,
          "attributes": [{ "name": "i18nMsg", "value": { "kind": "literal", "value": "a, b" } }],
          "children": [{ "kind": "expression", "source": "x" }] },
        { "kind": "element", "tag": "p", "line": 2,
          "children": [{ "kind": "text", "value": "Fine" }] }
    ] });
    fs::write(&path, document.to_string()).unwrap();

    let options = ScanOptions {
        on_error: ErrorPolicy::SkipMessage,
        ..ScanOptions::default()
    };
    let outcomes = scan_inputs(std::slice::from_ref(&path), &options, 1024 * 1024).unwrap();
    let units = collect_units(outcomes, &NoopAuditSink).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].catalog.ids().collect::<Vec<_>>(), vec!["Fine"]);

    let aborted = scan_inputs(&[path], &ScanOptions::default(), 1024 * 1024).unwrap();
    assert!(matches!(aborted[0].result, Err(UnitFailure::Scan(_))));
}
