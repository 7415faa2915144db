// crates/markup-msg-core/tests/catalog.rs
// ============================================================================
// Test Module: Catalog Builder
// Coverage: Message accumulation, merge determinism, and comment policies.
// ============================================================================
//! ## Overview
//! Integration tests for catalog accumulation and merging.

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

mod support;

use markup_msg_core::Catalog;
use markup_msg_core::CommentMergePolicy;
use markup_msg_core::MessageEntry;
use markup_msg_core::SourceLocation;
use markup_msg_core::UnitCatalog;
use markup_msg_core::merge_catalogs;
use markup_msg_core::merge_units;
use support::TestResult;
use support::ensure;

// ========================================================================
// Helpers
// ========================================================================

/// Builds a one-message catalog.
fn single(id: &str, file: &str, line: u32, comment: Option<&str>) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.add_message(id, SourceLocation::new(file, line), comment);
    catalog
}

/// Renders the references of `id` as strings.
fn references(catalog: &Catalog, id: &str) -> Vec<String> {
    catalog
        .get(id)
        .map(|entry| entry.comments.reference.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

// ========================================================================
// Accumulation
// ========================================================================

/// Tests repeats add new locations once and keep the first comment.
#[test]
fn add_message_deduplicates() -> TestResult {
    let mut catalog = Catalog::new();
    ensure(catalog.add_message("Hello", SourceLocation::new("a.jsx", 1), None), "first add creates")?;
    ensure(
        !catalog.add_message("Hello", SourceLocation::new("a.jsx", 1), Some("greeting")),
        "repeat add does not create",
    )?;
    catalog.add_message("Hello", SourceLocation::new("a.jsx", 9), Some("other"));

    ensure(catalog.len() == 1, "one entry expected")?;
    ensure(references(&catalog, "Hello") == vec!["a.jsx:1", "a.jsx:9"], "unexpected references")?;
    let entry = catalog.get("Hello").ok_or("missing entry")?;
    ensure(entry.comments.extracted.as_deref() == Some("greeting"), "comment set once")?;
    ensure(entry.translations.is_empty(), "new entries are untranslated")?;
    Ok(())
}

/// Tests insertion order is preserved.
#[test]
fn keeps_insertion_order() -> TestResult {
    let mut catalog = Catalog::new();
    for id in ["zeta", "alpha", "mid"] {
        catalog.add_message(id, SourceLocation::file_only("u"), None);
    }
    let ids: Vec<&str> = catalog.ids().collect();
    ensure(ids == vec!["zeta", "alpha", "mid"], format!("got {ids:?}"))?;
    Ok(())
}

// ========================================================================
// Merging
// ========================================================================

/// Tests merging two units that share an id.
#[test]
fn merges_shared_ids_in_supplied_order() -> TestResult {
    let a = single("Hello", "a.jsx", 3, None);
    let b = single("Hello", "b.jsx", 7, None);
    let merged = merge_catalogs([a, b], CommentMergePolicy::KeepFirst);
    ensure(merged.len() == 1, "one entry expected")?;
    ensure(references(&merged, "Hello") == vec!["a.jsx:3", "b.jsx:7"], "unexpected references")?;
    Ok(())
}

/// Tests unit merging is independent of delivery order.
#[test]
fn merge_units_sorts_by_unit() -> TestResult {
    let unit = |name: &str, id: &str| UnitCatalog {
        unit: name.to_string(),
        catalog: single(id, name, 1, None),
    };
    let forward = merge_units(
        vec![unit("a.jsx", "Hello"), unit("b.jsx", "Hello"), unit("c.jsx", "Bye")],
        CommentMergePolicy::KeepFirst,
    );
    let backward = merge_units(
        vec![unit("c.jsx", "Bye"), unit("b.jsx", "Hello"), unit("a.jsx", "Hello")],
        CommentMergePolicy::KeepFirst,
    );
    ensure(forward == backward, "merge must not depend on delivery order")?;
    ensure(forward.ids().collect::<Vec<_>>() == vec!["Hello", "Bye"], "ids follow sorted units")?;
    Ok(())
}

/// Tests the keep-first comment policy.
#[test]
fn keep_first_comment_policy() -> TestResult {
    let merged = merge_catalogs(
        [
            single("Save", "a", 1, None),
            single("Save", "b", 1, Some("button")),
            single("Save", "c", 1, Some("menu")),
        ],
        CommentMergePolicy::KeepFirst,
    );
    let entry = merged.get("Save").ok_or("missing entry")?;
    ensure(entry.comments.extracted.as_deref() == Some("button"), "first comment wins")?;
    Ok(())
}

/// Tests the concatenate-distinct comment policy.
#[test]
fn concatenate_distinct_comment_policy() -> TestResult {
    let merged = merge_catalogs(
        [
            single("Save", "a", 1, Some("button")),
            single("Save", "b", 1, Some("menu")),
            single("Save", "c", 1, Some("button")),
        ],
        CommentMergePolicy::ConcatenateDistinct,
    );
    let entry = merged.get("Save").ok_or("missing entry")?;
    ensure(entry.comments.extracted.as_deref() == Some("button\nmenu"), "distinct comments joined")?;
    Ok(())
}

/// Tests the first non-empty translation list wins.
#[test]
fn first_translation_wins() -> TestResult {
    let mut translated = MessageEntry::new("Yes");
    translated.translations = vec!["Sí".to_string()];
    let mut second = MessageEntry::new("Yes");
    second.translations = vec!["Oui".to_string()];

    let mut catalog = single("Yes", "a", 1, None);
    catalog.merge_entry(translated, CommentMergePolicy::KeepFirst);
    catalog.merge_entry(second, CommentMergePolicy::KeepFirst);
    let entry = catalog.get("Yes").ok_or("missing entry")?;
    ensure(entry.translations == vec!["Sí".to_string()], "first non-empty translation kept")?;
    Ok(())
}
