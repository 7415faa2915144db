// crates/markup-msg-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `markup-msg config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example lists every key with its default value, so it doubles as a
//! reference for the available settings.

/// Returns a canonical example `markup-msg.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"# markup-msg.toml

[extract]
# Collapse whitespace runs in message ids.
normalize_whitespace = true
# Attribute that turns an element into one message with nested markup.
# Its value lists placeholder names for embedded expressions: "name, count".
message_attribute = "i18nMsg"
# Attribute carrying a comment for translators.
comment_attribute = "i18nComment"
# Elements carrying this attribute are skipped.
lang_attribute = "lang"
translatable_attributes = ["alt", "placeholder", "title"]
element_blacklist = ["style", "code"]
preserve_whitespace_elements = ["pre", "textarea"]
# Accept names in the message attribute that no expression uses.
allow_unused_placeholders = false
# "abort" or "skip_message".
on_error = "abort"
max_input_bytes = 8388608

[catalog]
# "keep_first" or "concatenate_distinct".
comment_merge = "keep_first"
# "empty" or "source_text".
seed_translations = "empty"
# "po" or "json".
format = "po"

[audit]
enabled = false
# path = "markup-msg-audit.jsonl"
"#,
    )
}
