// crates/markup-msg-cli/tests/commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that drive the markup-msg binary end to end.
// Purpose: Ensure extract, render, check, and config commands behave as documented.
// Dependencies: markup-msg-cli binary, markup-msg-core, tempfile
// ============================================================================
//! ## Overview
//! Runs the compiled `markup-msg` binary inside a scratch directory with a
//! clean environment and inspects its output streams and files.

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
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use markup_msg_core::AttributeValue;
use markup_msg_core::CatalogDocument;
use markup_msg_core::MarkupElement;
use markup_msg_core::MarkupNode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn markup_msg_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_markup-msg"))
}

/// Runs the binary in `dir` with locale, config, and timestamp overrides cleared.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(markup_msg_bin())
        .current_dir(dir)
        .env_remove("MARKUP_MSG_LANG")
        .env_remove("MARKUP_MSG_CONFIG")
        .env_remove("SOURCE_DATE_EPOCH")
        .args(args)
        .output()
        .expect("run markup-msg")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes a markup document containing a plain paragraph and a complex message.
fn write_page(dir: &TempDir) {
    let page = r#"{ "nodes": [
        { "kind": "element", "tag": "h1", "line": 1,
          "children": [{ "kind": "text", "value": "Welcome" }] },
        { "kind": "element", "tag": "p", "line": 2,
          "attributes": [
            { "name": "i18nMsg", "value": { "kind": "literal", "value": "name" } },
            { "name": "i18nComment", "value": { "kind": "literal", "value": "Greeting line" } } ],
          "children": [
            { "kind": "text", "value": "Hi " },
            { "kind": "expression", "source": "user.name" },
            { "kind": "text", "value": ", see " },
            { "kind": "element", "tag": "a", "children": [{ "kind": "text", "value": "help" }] } ] }
    ] }"#;
    fs::write(dir.path().join("page.json"), page).unwrap();
}

// ============================================================================
// SECTION: Extract
// ============================================================================

/// Verifies PO output on stdout with a fixed creation date.
#[test]
fn extract_writes_po_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write_page(&dir);
    let output =
        run_in(dir.path(), &["extract", "--creation-date", "2024-03-01T12:30:00Z", "page.json"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let po = stdout_of(&output);
    assert!(po.starts_with("msgid \"\"\nmsgstr \"\"\n"), "unexpected PO:\n{po}");
    assert!(po.contains("\"POT-Creation-Date: 2024-03-01 12:30+0000\\n\"\n"));
    assert!(po.contains("#: page.json:1\nmsgid \"Welcome\"\nmsgstr \"\"\n"));
    assert!(po.contains("#. Greeting line\n#: page.json:2\nmsgid \"Hi {name}, see [1:help]\"\n"));
}

/// Verifies `SOURCE_DATE_EPOCH` and JSON output to a file.
#[test]
fn extract_writes_json_document_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write_page(&dir);
    let output = Command::new(markup_msg_bin())
        .current_dir(dir.path())
        .env_remove("MARKUP_MSG_LANG")
        .env_remove("MARKUP_MSG_CONFIG")
        .env("SOURCE_DATE_EPOCH", "1709296200")
        .args(["extract", "--format", "json", "--output", "messages.json", "page.json"])
        .output()
        .expect("run markup-msg");
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Wrote 2 messages to messages.json"));

    let json = fs::read_to_string(dir.path().join("messages.json")).unwrap();
    let document: CatalogDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(document.header.creation_date, "2024-03-01 12:30+0000");
    let ids: Vec<&str> = document.records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["Welcome", "Hi {name}, see [1:help]"]);
    assert_eq!(document.records[1].extracted.as_deref(), Some("Greeting line"));
}

/// Verifies config settings reach the scanner and the audit log.
#[test]
fn extract_honors_config_and_audit_log() {
    let dir = tempfile::tempdir().unwrap();
    write_page(&dir);
    fs::write(
        dir.path().join("markup-msg.toml"),
        "[extract]\nelement_blacklist = [\"h1\"]\n\n[catalog]\nseed_translations = \
         \"source_text\"\n\n[audit]\nenabled = true\npath = \"audit.jsonl\"\n",
    )
    .unwrap();
    let output =
        run_in(dir.path(), &["extract", "--creation-date", "2024-03-01T12:30:00Z", "page.json"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let po = stdout_of(&output);
    assert!(!po.contains("Welcome"), "blacklisted element leaked:\n{po}");
    assert!(po.contains("msgstr \"Hi {name}, see [1:help]\""));

    let audit = fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
    let event: serde_json::Value = serde_json::from_str(audit.lines().next().unwrap()).unwrap();
    assert_eq!(event["unit"], "page.json");
    assert_eq!(event["outcome"], "ok");
}

/// Verifies extraction errors name the file and line and fail the run.
#[test]
fn extract_reports_located_errors() {
    let dir = tempfile::tempdir().unwrap();
    let broken = r#"{ "nodes": [
        { "kind": "element", "tag": "p", "line": 9,
          "attributes": [{ "name": "i18nMsg", "value": { "kind": "literal", "value": "a, b" } }],
          "children": [{ "kind": "expression", "source": "x" }] } ] }"#;
    fs::write(dir.path().join("broken.json"), broken).unwrap();
    let output = run_in(dir.path(), &["extract", "broken.json"]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("broken.json:9"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("`b`"), "unexpected stderr: {stderr}");
}

/// Verifies unreadable input is reported with its path.
#[test]
fn extract_rejects_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["extract", "absent.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("absent.json"));
}

// ============================================================================
// SECTION: Render and Check
// ============================================================================

/// Verifies rendering rebuilds the element tree with substituted values.
#[test]
fn render_prints_element_tree() {
    let dir = tempfile::tempdir().unwrap();
    let slots = r#"[
        { "tag": "p" },
        { "tag": "a", "attributes": [{ "name": "href", "value": { "kind": "literal", "value": "/help" } }] }
    ]"#;
    fs::write(dir.path().join("slots.json"), slots).unwrap();
    fs::write(dir.path().join("values.json"), r#"{ "name": "Ada" }"#).unwrap();
    let output = run_in(
        dir.path(),
        &[
            "render",
            "--template",
            "Hi {name}, see [1:help]",
            "--slots",
            "slots.json",
            "--expressions",
            "values.json",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let rendered: MarkupElement = serde_json::from_str(&stdout_of(&output)).unwrap();
    let expected = MarkupElement::new("p").with_child(MarkupNode::text("Hi Ada, see ")).with_child(
        MarkupElement::new("a")
            .with_attribute("href", AttributeValue::Literal("/help".to_string()))
            .with_child(MarkupNode::text("help")),
    );
    assert_eq!(rendered, expected);
}

/// Verifies missing placeholder values fail rendering.
#[test]
fn render_rejects_missing_expression() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("slots.json"), r#"[{ "tag": "p" }]"#).unwrap();
    let output =
        run_in(dir.path(), &["render", "--template", "{count} items", "--slots", "slots.json"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("missing expression `count`"));
}

/// Verifies `check` reports each template and fails when any is malformed.
#[test]
fn check_reports_each_template() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["check", "Click [1:here]", "Broken [1:here"]);
    assert!(!output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("ok: Click [1:here]"), "unexpected stdout: {stdout}");
    assert!(stdout.contains("error: Broken [1:here"), "unexpected stdout: {stdout}");
    assert!(stderr_of(&output).contains("1 of 2 templates failed."));
}

/// Verifies braces in a reported template are printed as typed.
#[test]
fn check_prints_template_braces_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["check", "{error} items ["]);
    assert!(!output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("error: {error} items [: "), "unexpected stdout: {stdout}");
}

// ============================================================================
// SECTION: Config and Globals
// ============================================================================

/// Verifies the example config validates.
#[test]
fn config_example_validates() {
    let dir = tempfile::tempdir().unwrap();
    let example = run_in(dir.path(), &["config", "example"]);
    assert!(example.status.success());
    fs::write(dir.path().join("example.toml"), &example.stdout).unwrap();
    let output = run_in(dir.path(), &["config", "validate", "--config", "example.toml"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("Config valid."));
}

/// Verifies invalid config is rejected.
#[test]
fn config_validate_rejects_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[extract]\nmax_input_bytes = 0\n").unwrap();
    let output = run_in(dir.path(), &["config", "validate", "--config", "bad.toml"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Failed to load config"));
}

/// Verifies `--version` and the Catalan locale.
#[test]
fn version_and_catalan_output() {
    let dir = tempfile::tempdir().unwrap();
    let version = run_in(dir.path(), &["--version"]);
    assert!(version.status.success());
    assert!(stdout_of(&version).starts_with("markup-msg "));

    let output = run_in(dir.path(), &["--lang", "ca", "check", "[1:ok]"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("correcte: [1:ok]"));
    assert!(stderr_of(&output).contains("traduïda automàticament"));
}
