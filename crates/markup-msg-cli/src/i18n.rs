// crates/markup-msg-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for English and Catalan output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The markup-msg CLI stores user-facing strings in small per-locale
//! translation catalogs. All runtime output should be routed through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_', '.']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "markup-msg {version}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.kind.document", "markup document"),
    ("input.kind.slots", "slot list"),
    ("input.kind.expressions", "expression values"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.parse_failed", "Failed to parse {kind} JSON at {path}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("extract.worker_failed", "An extraction worker stopped unexpectedly."),
    ("extract.skipped", "Skipped message: {error}"),
    ("extract.scan_failed", "Extraction failed: {error}"),
    ("extract.creation_date.invalid", "Invalid creation date {value}: {error}"),
    (
        "extract.source_date_epoch.invalid",
        "Invalid value for {env}: {value}. Expected a unix timestamp in seconds.",
    ),
    ("extract.serialize_failed", "Failed to serialize catalog: {error}"),
    ("extract.write_failed", "Failed to write catalog to {path}: {error}"),
    ("extract.ok", "Wrote {count} messages to {path}"),
    ("render.failed", "Failed to render template: {error}"),
    ("render.serialize_failed", "Failed to serialize rendered markup: {error}"),
    ("check.ok", "ok: {template}"),
    ("check.failed", "error: {template}: {error}"),
    ("check.summary", "{failed} of {total} templates failed."),
];

/// Static Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "markup-msg {version}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("input.kind.document", "document de marcatge"),
    ("input.kind.slots", "llista de ranures"),
    ("input.kind.expressions", "valors d'expressions"),
    ("input.read_failed", "No s'ha pogut llegir {kind} a {path}: {error}"),
    (
        "input.read_too_large",
        "Es rebutja llegir {kind} a {path} perquè ocupa {size} bytes (límit {limit}).",
    ),
    ("input.parse_failed", "No s'ha pogut analitzar el JSON de {kind} a {path}: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("audit.open_failed", "No s'ha pogut obrir el registre d'auditoria a {path}: {error}"),
    ("extract.worker_failed", "Un fil d'extracció s'ha aturat inesperadament."),
    ("extract.skipped", "Missatge omès: {error}"),
    ("extract.scan_failed", "L'extracció ha fallat: {error}"),
    ("extract.creation_date.invalid", "Data de creació no vàlida {value}: {error}"),
    (
        "extract.source_date_epoch.invalid",
        "Valor no vàlid per a {env}: {value}. S'esperava una marca de temps unix en segons.",
    ),
    ("extract.serialize_failed", "No s'ha pogut serialitzar el catàleg: {error}"),
    ("extract.write_failed", "No s'ha pogut escriure el catàleg a {path}: {error}"),
    ("extract.ok", "S'han escrit {count} missatges a {path}"),
    ("render.failed", "No s'ha pogut renderitzar la plantilla: {error}"),
    ("render.serialize_failed", "No s'ha pogut serialitzar el marcatge renderitzat: {error}"),
    ("check.ok", "correcte: {template}"),
    ("check.failed", "error: {template}: {error}"),
    ("check.summary", "Han fallat {failed} de {total} plantilles."),
];

/// Returns the raw catalog entries for `locale`, in declaration order.
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let map = match locale {
        Locale::En => &CATALOG_EN_MAP,
        Locale::Ca => &CATALOG_CA_MAP,
    };
    map.get_or_init(|| catalog_entries_for(locale).iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Translates `key` for an explicit `locale`.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    substitute(template, &args)
}

/// Replaces each `{key}` in `template` with its argument in one pass.
///
/// Inserted values are copied verbatim and never scanned again, so user
/// text containing `{key}` survives intact.
fn substitute(template: &str, args: &[MessageArg]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[.. open]);
        let after = &rest[open + 1 ..];
        let value = after.find('}').and_then(|close| {
            let key = &after[.. close];
            args.iter().find(|arg| arg.key == key).map(|arg| (arg.value.as_str(), close))
        });
        if let Some((value, close)) = value {
            result.push_str(value);
            rest = &after[close + 1 ..];
        } else {
            result.push('{');
            rest = after;
        }
    }
    result.push_str(rest);
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
