// crates/markup-msg-config/src/config.rs
// ============================================================================
// Module: markup-msg Configuration
// Description: Configuration loading and validation for markup-msg.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: markup-msg-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from `markup-msg.toml`. The path comes from the
//! caller, then the `MARKUP_MSG_CONFIG` environment variable, then the
//! working directory. Only a missing default file falls back to built-in
//! defaults; an explicitly named file that cannot be read is an error.
//!
//! Sections:
//! - `[extract]`: scanner attributes, skip lists, whitespace handling, input limits.
//! - `[catalog]`: comment merging, translation seeding, output format.
//! - `[audit]`: JSON-lines extraction events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use markup_msg_core::CommentMergePolicy;
use markup_msg_core::ErrorPolicy;
use markup_msg_core::ScanOptions;
use markup_msg_core::TranslationSeed;
use markup_msg_core::scan::DEFAULT_COMMENT_ATTRIBUTE;
use markup_msg_core::scan::DEFAULT_ELEMENT_BLACKLIST;
use markup_msg_core::scan::DEFAULT_LANG_ATTRIBUTE;
use markup_msg_core::scan::DEFAULT_MESSAGE_ATTRIBUTE;
use markup_msg_core::scan::DEFAULT_PRESERVE_WHITESPACE_ELEMENTS;
use markup_msg_core::scan::DEFAULT_TRANSLATABLE_ATTRIBUTES;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "markup-msg.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "MARKUP_MSG_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of an attribute or element name.
pub(crate) const MAX_NAME_LENGTH: usize = 128;
/// Maximum entries in any name list.
pub(crate) const MAX_NAME_LIST_ENTRIES: usize = 64;
/// Default per-file input limit for markup documents.
pub(crate) const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;
/// Upper bound for the per-file input limit.
pub(crate) const MAX_INPUT_BYTES_LIMIT: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// markup-msg configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkupMsgConfig {
    /// Extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,
    /// Catalog output settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// File the configuration was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl MarkupMsgConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved.path)?;
        if resolved.fallback_to_defaults && !resolved.path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let mut config = Self::from_bytes(&bytes)?;
        config.source = Some(resolved.path);
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are oversized, not UTF-8,
    /// not valid TOML, or fail validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extract.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// `[extract]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractConfig {
    /// Collapse whitespace in message ids.
    #[serde(default = "default_true")]
    pub normalize_whitespace: bool,
    /// Attribute that marks a complex message.
    #[serde(default = "default_message_attribute")]
    pub message_attribute: String,
    /// Attribute holding the developer comment.
    #[serde(default = "default_comment_attribute")]
    pub comment_attribute: String,
    /// Attribute that excludes an element subtree.
    #[serde(default = "default_lang_attribute")]
    pub lang_attribute: String,
    /// Attributes whose literal values are messages.
    #[serde(default = "default_translatable_attributes")]
    pub translatable_attributes: Vec<String>,
    /// Element tags skipped with their subtree.
    #[serde(default = "default_element_blacklist")]
    pub element_blacklist: Vec<String>,
    /// Element tags whose whitespace is kept verbatim.
    #[serde(default = "default_preserve_whitespace_elements")]
    pub preserve_whitespace_elements: Vec<String>,
    /// Accept placeholder names that no expression slot uses.
    #[serde(default)]
    pub allow_unused_placeholders: bool,
    /// Failure handling for individual messages.
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Maximum size of one input document in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            message_attribute: default_message_attribute(),
            comment_attribute: default_comment_attribute(),
            lang_attribute: default_lang_attribute(),
            translatable_attributes: default_translatable_attributes(),
            element_blacklist: default_element_blacklist(),
            preserve_whitespace_elements: default_preserve_whitespace_elements(),
            allow_unused_placeholders: false,
            on_error: ErrorPolicy::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ExtractConfig {
    /// Validates extraction settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("extract.message_attribute", &self.message_attribute)?;
        validate_name("extract.comment_attribute", &self.comment_attribute)?;
        validate_name("extract.lang_attribute", &self.lang_attribute)?;
        validate_name_list("extract.translatable_attributes", &self.translatable_attributes)?;
        validate_name_list("extract.element_blacklist", &self.element_blacklist)?;
        validate_name_list(
            "extract.preserve_whitespace_elements",
            &self.preserve_whitespace_elements,
        )?;
        if self.message_attribute == self.comment_attribute {
            return Err(ConfigError::Invalid(
                "extract.message_attribute and extract.comment_attribute must differ".to_string(),
            ));
        }
        for reserved in [&self.message_attribute, &self.comment_attribute] {
            if self.translatable_attributes.contains(reserved) {
                return Err(ConfigError::Invalid(format!(
                    "extract.translatable_attributes must not contain {reserved}"
                )));
            }
        }
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_INPUT_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "extract.max_input_bytes must be between 1 and {MAX_INPUT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Builds scanner options from this section.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            normalize_whitespace: self.normalize_whitespace,
            message_attribute: self.message_attribute.clone(),
            comment_attribute: self.comment_attribute.clone(),
            lang_attribute: self.lang_attribute.clone(),
            translatable_attributes: self.translatable_attributes.clone(),
            element_blacklist: self.element_blacklist.clone(),
            preserve_whitespace_elements: self.preserve_whitespace_elements.clone(),
            allow_unused_placeholders: self.allow_unused_placeholders,
            on_error: self.on_error,
        }
    }
}

// ============================================================================
// SECTION: Catalog Output
// ============================================================================

/// Catalog file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogFormat {
    /// gettext PO text.
    #[default]
    Po,
    /// JSON catalog document.
    Json,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Resolution of conflicting developer comments.
    #[serde(default)]
    pub comment_merge: CommentMergePolicy,
    /// Initial translation for untranslated entries.
    #[serde(default)]
    pub seed_translations: TranslationSeed,
    /// Default output format.
    #[serde(default)]
    pub format: CatalogFormat,
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// `[audit]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Emit JSON-lines extraction events.
    #[serde(default)]
    pub enabled: bool,
    /// Audit log file; events go to stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Returns the audit log path with surrounding whitespace removed.
    #[must_use]
    pub fn log_path(&self) -> Option<&str> {
        self.path.as_deref().map(str::trim)
    }

    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = self.log_path() {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Serde default for enabled flags.
const fn default_true() -> bool {
    true
}

/// Serde default for `extract.message_attribute`.
fn default_message_attribute() -> String {
    DEFAULT_MESSAGE_ATTRIBUTE.to_string()
}

/// Serde default for `extract.comment_attribute`.
fn default_comment_attribute() -> String {
    DEFAULT_COMMENT_ATTRIBUTE.to_string()
}

/// Serde default for `extract.lang_attribute`.
fn default_lang_attribute() -> String {
    DEFAULT_LANG_ATTRIBUTE.to_string()
}

/// Serde default for `extract.translatable_attributes`.
fn default_translatable_attributes() -> Vec<String> {
    to_strings(DEFAULT_TRANSLATABLE_ATTRIBUTES)
}

/// Serde default for `extract.element_blacklist`.
fn default_element_blacklist() -> Vec<String> {
    to_strings(DEFAULT_ELEMENT_BLACKLIST)
}

/// Serde default for `extract.preserve_whitespace_elements`.
fn default_preserve_whitespace_elements() -> Vec<String> {
    to_strings(DEFAULT_PRESERVE_WHITESPACE_ELEMENTS)
}

/// Serde default for `extract.max_input_bytes`.
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

/// Converts a static list into owned strings.
fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path plus whether a missing file may fall back to defaults.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True only for the implicit default filename.
    fallback_to_defaults: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            fallback_to_defaults: false,
        });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            fallback_to_defaults: false,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        fallback_to_defaults: true,
    })
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(value).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an attribute or element name.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Validates a list of names.
fn validate_name_list(field: &str, values: &[String]) -> Result<(), ConfigError> {
    if values.len() > MAX_NAME_LIST_ENTRIES {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds {MAX_NAME_LIST_ENTRIES} entries"
        )));
    }
    for value in values {
        validate_name(field, value)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
