// crates/markup-msg-core/src/po.rs
// ============================================================================
// Module: Catalog Serialization
// Description: Structured catalog documents and gettext PO rendering.
// Purpose: Emit reproducible catalog files from an in-memory catalog.
// Dependencies: serde, time, crate::catalog
// ============================================================================

//! ## Overview
//! [`serialize`] turns a [`Catalog`] into a [`CatalogDocument`]: a header
//! block plus one [`CatalogRecord`] per id in insertion order. The document
//! serializes to JSON through serde, or to gettext PO text via [`write_po`].
//!
//! The creation timestamp is an input. Nothing here reads the clock, so two
//! runs over the same sources with the same timestamp produce identical
//! bytes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::UtcOffset;

use crate::catalog::Catalog;
use crate::location::SourceLocation;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Character set recorded in every catalog.
pub const CATALOG_CHARSET: &str = "utf-8";
/// `MIME-Version` header value.
pub const MIME_VERSION: &str = "1.0";
/// `Content-Type` header value.
pub const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";
/// `Content-Transfer-Encoding` header value.
pub const CONTENT_TRANSFER_ENCODING: &str = "8bit";

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Catalog header block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogHeader {
    /// Character set of the catalog.
    pub charset: String,
    /// Creation time as `YYYY-MM-DD HH:MM+0000`.
    pub creation_date: String,
    /// `MIME-Version` header.
    pub mime_version: String,
    /// `Content-Type` header.
    pub content_type: String,
    /// `Content-Transfer-Encoding` header.
    pub content_transfer_encoding: String,
}

impl CatalogHeader {
    /// Builds the standard header stamped with `created`.
    #[must_use]
    pub fn new(created: OffsetDateTime) -> Self {
        Self {
            charset: CATALOG_CHARSET.to_string(),
            creation_date: format_creation_date(created),
            mime_version: MIME_VERSION.to_string(),
            content_type: CONTENT_TYPE.to_string(),
            content_transfer_encoding: CONTENT_TRANSFER_ENCODING.to_string(),
        }
    }

    /// Returns header fields in PO order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("POT-Creation-Date", self.creation_date.as_str()),
            ("MIME-Version", self.mime_version.as_str()),
            ("Content-Type", self.content_type.as_str()),
            ("Content-Transfer-Encoding", self.content_transfer_encoding.as_str()),
        ]
    }
}

/// Formats `created` in UTC the way PO headers expect.
fn format_creation_date(created: OffsetDateTime) -> String {
    let utc = created.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}+0000",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute()
    )
}

/// One serialized message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Message id.
    pub id: String,
    /// Translations, possibly empty.
    pub translations: Vec<String>,
    /// Source references.
    pub references: Vec<SourceLocation>,
    /// Developer comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<String>,
}

/// Serialized catalog: header plus records in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Header block.
    pub header: CatalogHeader,
    /// Records in catalog insertion order.
    pub records: Vec<CatalogRecord>,
}

/// Initial translation for entries that have none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationSeed {
    /// Leave the translation list empty.
    #[default]
    Empty,
    /// Use the message id, as for a source-language catalog.
    SourceText,
}

/// Builds the document for `catalog`.
#[must_use]
pub fn serialize(catalog: &Catalog, header: CatalogHeader, seed: TranslationSeed) -> CatalogDocument {
    let records = catalog
        .entries()
        .iter()
        .map(|entry| {
            let translations = match (seed, entry.translations.is_empty()) {
                (TranslationSeed::SourceText, true) => vec![entry.id.clone()],
                _ => entry.translations.clone(),
            };
            CatalogRecord {
                id: entry.id.clone(),
                translations,
                references: entry.comments.reference.clone(),
                extracted: entry.comments.extracted.clone(),
            }
        })
        .collect();
    CatalogDocument {
        header,
        records,
    }
}

// ============================================================================
// SECTION: PO Rendering
// ============================================================================

/// Renders `document` as gettext PO text.
///
/// The header is the entry with an empty `msgid`. Each record is preceded by
/// `#.` lines for its developer comment and one `#:` line per reference.
/// Records with several translations are written as plural entries: the id
/// is repeated as `msgid_plural` and each translation gets an indexed
/// `msgstr[n]` keyword.
#[must_use]
pub fn write_po(document: &CatalogDocument) -> String {
    let mut out = String::new();
    out.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (name, value) in document.header.fields() {
        out.push('"');
        out.push_str(&escape_po(&format!("{name}: {value}\n")));
        out.push_str("\"\n");
    }

    for record in &document.records {
        out.push('\n');
        if let Some(comment) = &record.extracted {
            for line in comment.lines() {
                push_comment(&mut out, "#.", line);
            }
        }
        for reference in &record.references {
            push_comment(&mut out, "#:", &reference.to_string());
        }
        push_keyword(&mut out, "msgid", &record.id);
        match record.translations.as_slice() {
            [] => push_keyword(&mut out, "msgstr", ""),
            [single] => push_keyword(&mut out, "msgstr", single),
            several => {
                push_keyword(&mut out, "msgid_plural", &record.id);
                for (index, translation) in several.iter().enumerate() {
                    push_keyword(&mut out, &format!("msgstr[{index}]"), translation);
                }
            }
        }
    }
    out
}

/// Writes a comment line, omitting the trailing space for empty text.
fn push_comment(out: &mut String, marker: &str, text: &str) {
    out.push_str(marker);
    if !text.is_empty() {
        out.push(' ');
        out.push_str(text);
    }
    out.push('\n');
}

/// Writes `keyword "value"`, splitting multi-line values after each newline.
fn push_keyword(out: &mut String, keyword: &str, value: &str) {
    let multiline = value.trim_end_matches('\n').contains('\n');
    if !multiline {
        let _ = writeln!(out, "{keyword} \"{}\"", escape_po(value));
        return;
    }
    let _ = writeln!(out, "{keyword} \"\"");
    for line in value.split_inclusive('\n') {
        let _ = writeln!(out, "\"{}\"", escape_po(line));
    }
}

/// Escapes a string for a quoted PO literal.
#[must_use]
pub fn escape_po(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
