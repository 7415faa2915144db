// crates/markup-msg-cli/src/audit.rs
// ============================================================================
// Module: Extraction Audit Logging
// Description: Structured audit events for catalog extraction runs.
// Purpose: Emit JSON-lines records per scanned unit without a logging framework.
// Dependencies: markup-msg-config, markup-msg-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every unit the `extract` command scans produces one audit event, and every
//! message dropped under the skip policy produces another. Events are written
//! as one JSON object per line to stderr or to an append-only file, selected
//! by the `[audit]` config section.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use markup_msg_config::AuditConfig;
use markup_msg_core::LocatedError;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event label shared by all extraction records.
pub const EXTRACTION_EVENT: &str = "markup_extraction";

/// Outcome recorded for a unit or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The unit was scanned.
    Ok,
    /// One message was dropped and the unit kept going.
    Skipped,
    /// The unit could not be read or scanned.
    Failed,
}

/// Extraction audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Unit identifier (input path).
    pub unit: String,
    /// Outcome classification.
    pub outcome: ExtractionOutcome,
    /// Message id involved, when known.
    pub message_id: Option<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Free-form detail (message count or error text).
    pub detail: Option<String>,
}

/// Inputs required to construct an extraction audit event.
pub struct ExtractionAuditEventParams {
    /// Unit identifier (input path).
    pub unit: String,
    /// Outcome classification.
    pub outcome: ExtractionOutcome,
    /// Message id involved, when known.
    pub message_id: Option<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Free-form detail.
    pub detail: Option<String>,
}

impl ExtractionAuditEvent {
    /// Creates a new audit event stamped with the current time.
    #[must_use]
    pub fn new(params: ExtractionAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: EXTRACTION_EVENT,
            timestamp_ms,
            unit: params.unit,
            outcome: params.outcome,
            message_id: params.message_id,
            error_kind: params.error_kind,
            detail: params.detail,
        }
    }

    /// Event for a unit scanned with `messages` entries.
    #[must_use]
    pub fn scanned(unit: &str, messages: usize) -> Self {
        Self::new(ExtractionAuditEventParams {
            unit: unit.to_string(),
            outcome: ExtractionOutcome::Ok,
            message_id: None,
            error_kind: None,
            detail: Some(format!("messages={messages}")),
        })
    }

    /// Event for a located template failure.
    #[must_use]
    pub fn located(unit: &str, outcome: ExtractionOutcome, error: &LocatedError) -> Self {
        Self::new(ExtractionAuditEventParams {
            unit: unit.to_string(),
            outcome,
            message_id: error.message_id.clone(),
            error_kind: Some(error.error.kind_label()),
            detail: Some(error.to_string()),
        })
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for extraction events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ExtractionAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &ExtractionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &ExtractionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &ExtractionAuditEvent) {}
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Builds the sink selected by the `[audit]` config section.
///
/// # Errors
///
/// Returns an error if the configured audit file cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    match config.log_path() {
        Some(path) => Ok(Box::new(FileAuditSink::new(Path::new(path))?)),
        None => Ok(Box::new(StderrAuditSink)),
    }
}
