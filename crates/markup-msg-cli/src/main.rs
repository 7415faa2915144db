// crates/markup-msg-cli/src/main.rs
// ============================================================================
// Module: markup-msg CLI Entry Point
// Description: Command dispatcher for catalog extraction and template tooling.
// Purpose: Provide a safe, localized CLI over the markup-msg core library.
// Dependencies: clap, markup-msg-config, markup-msg-core, serde_json, thiserror, time.
// ============================================================================

//! ## Overview
//! The markup-msg CLI scans serialized markup documents into a message
//! catalog, renders templates against slot elements, and checks template
//! syntax. All user-facing strings are routed through the i18n catalog.
//! Security posture: inputs are untrusted and are read with size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use markup_msg_cli::audit::AuditSink;
use markup_msg_cli::audit::ExtractionAuditEvent;
use markup_msg_cli::audit::ExtractionAuditEventParams;
use markup_msg_cli::audit::ExtractionOutcome;
use markup_msg_cli::audit::sink_from_config;
use markup_msg_cli::i18n::Locale;
use markup_msg_cli::i18n::set_locale;
use markup_msg_cli::t;
use markup_msg_config::CatalogFormat;
use markup_msg_config::MarkupMsgConfig;
use markup_msg_config::config_toml_example;
use markup_msg_core::CatalogHeader;
use markup_msg_core::LocatedError;
use markup_msg_core::MarkupDocument;
use markup_msg_core::MarkupElement;
use markup_msg_core::ScanOptions;
use markup_msg_core::UnitCatalog;
use markup_msg_core::UnitReport;
use markup_msg_core::merge_units;
use markup_msg_core::parse;
use markup_msg_core::render_template;
use markup_msg_core::scan_unit;
use markup_msg_core::serialize;
use markup_msg_core::write_po;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a slot list or expression values file for `render`.
const MAX_RENDER_INPUT_BYTES: usize = 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "MARKUP_MSG_LANG";
/// Environment variable carrying a reproducible build timestamp.
const SOURCE_DATE_EPOCH_ENV: &str = "SOURCE_DATE_EPOCH";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "markup-msg", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `MARKUP_MSG_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Config file path (defaults to markup-msg.toml or `MARKUP_MSG_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan markup documents and write a message catalog.
    Extract(ExtractCommand),
    /// Render a template against slot elements and print the result.
    Render(RenderCommand),
    /// Report syntax errors in templates.
    Check(CheckCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `extract`.
#[derive(Args, Debug)]
struct ExtractCommand {
    /// Catalog output format (defaults to `catalog.format` in config).
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<CatalogFormatArg>,
    /// Output path for the catalog (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Catalog creation time as RFC 3339 (defaults to `SOURCE_DATE_EPOCH`, then now).
    #[arg(long, value_name = "RFC3339")]
    creation_date: Option<String>,
    /// Markup documents (JSON) to scan.
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
struct RenderCommand {
    /// Template text to render.
    #[arg(long, value_name = "TEMPLATE")]
    template: String,
    /// JSON array of slot elements; entry 0 is the root.
    #[arg(long, value_name = "PATH")]
    slots: PathBuf,
    /// JSON object of placeholder values.
    #[arg(long, value_name = "PATH")]
    expressions: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Templates to check.
    #[arg(value_name = "TEMPLATE", required = true)]
    templates: Vec<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a markup-msg configuration file.
    Validate,
    /// Print an example configuration with every default spelled out.
    Example,
}

/// Catalog formats selectable on the command line.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum CatalogFormatArg {
    /// gettext PO text.
    Po,
    /// JSON catalog document.
    Json,
}

/// Supported CLI languages.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Extract(command) => command_extract(&command, cli.config.as_deref()),
        Commands::Render(command) => command_render(&command),
        Commands::Check(command) => command_check(&command),
        Commands::Config {
            command,
        } => command_config(&command, cli.config.as_deref()),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Loads configuration from an explicit path, the env override, or the default file.
fn load_config(path: Option<&Path>) -> CliResult<MarkupMsgConfig> {
    MarkupMsgConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let _config = load_config(config_path)?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Extract Command
// ============================================================================

/// Why one input unit produced no catalog.
#[derive(Debug)]
enum UnitFailure {
    /// The input could not be read or decoded.
    Input(CliError),
    /// A message in the unit could not be extracted.
    Scan(LocatedError),
}

/// Scan result for one input file.
#[derive(Debug)]
struct UnitOutcome {
    /// Unit identifier (input path as given).
    unit: String,
    /// Report or failure.
    result: Result<UnitReport, UnitFailure>,
}

/// Executes the `extract` command.
fn command_extract(command: &ExtractCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let source_date_epoch = std::env::var(SOURCE_DATE_EPOCH_ENV).ok();
    let created =
        resolve_creation_time(command.creation_date.as_deref(), source_date_epoch.as_deref())?;
    let sink = sink_from_config(&config.audit).map_err(|err| {
        CliError::new(t!(
            "audit.open_failed",
            path = config.audit.path.as_deref().unwrap_or_default(),
            error = err
        ))
    })?;

    let mut inputs = command.inputs.clone();
    inputs.sort();
    inputs.dedup();
    let options = config.extract.scan_options();
    let outcomes = scan_inputs(&inputs, &options, config.extract.max_input_bytes)?;
    let units = collect_units(outcomes, sink.as_ref())?;

    let catalog = merge_units(units, config.catalog.comment_merge);
    let document = serialize(&catalog, CatalogHeader::new(created), config.catalog.seed_translations);
    let format = command.format.map_or(config.catalog.format, CatalogFormat::from);
    let rendered = match format {
        CatalogFormat::Po => write_po(&document),
        CatalogFormat::Json => {
            let mut json = serde_json::to_string_pretty(&document)
                .map_err(|err| CliError::new(t!("extract.serialize_failed", error = err)))?;
            json.push('\n');
            json
        }
    };

    match &command.output {
        Some(path) => {
            fs::write(path, rendered.as_bytes()).map_err(|err| {
                CliError::new(t!("extract.write_failed", path = path.display(), error = err))
            })?;
            write_stdout_line(&t!("extract.ok", count = catalog.len(), path = path.display()))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        None => write_stdout_bytes(rendered.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Scans `inputs` on scoped worker threads and returns outcomes in input order.
fn scan_inputs(
    inputs: &[PathBuf],
    options: &ScanOptions,
    max_bytes: usize,
) -> CliResult<Vec<UnitOutcome>> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    let workers =
        thread::available_parallelism().map_or(1, NonZeroUsize::get).clamp(1, inputs.len());
    let chunk_size = inputs.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk.iter().map(|path| scan_input(path, options, max_bytes)).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(inputs.len());
        for handle in handles {
            let batch =
                handle.join().map_err(|_| CliError::new(t!("extract.worker_failed")))?;
            outcomes.extend(batch);
        }
        Ok(outcomes)
    })
}

/// Reads, decodes, and scans one markup document.
fn scan_input(path: &Path, options: &ScanOptions, max_bytes: usize) -> UnitOutcome {
    let unit = path.display().to_string();
    let result = read_json::<MarkupDocument>(path, &t!("input.kind.document"), max_bytes)
        .map_err(UnitFailure::Input)
        .and_then(|document| {
            scan_unit(&unit, &document.nodes, options).map_err(UnitFailure::Scan)
        });
    UnitOutcome {
        unit,
        result,
    }
}

/// Records audit events for every outcome and returns the partial catalogs.
///
/// The first failure in input order is returned after all events are recorded.
fn collect_units(
    outcomes: Vec<UnitOutcome>,
    sink: &dyn AuditSink,
) -> CliResult<Vec<UnitCatalog>> {
    let mut units = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(report) => {
                for diagnostic in &report.diagnostics {
                    sink.record(&ExtractionAuditEvent::located(
                        &outcome.unit,
                        ExtractionOutcome::Skipped,
                        diagnostic,
                    ));
                    write_stderr_line(&t!("extract.skipped", error = diagnostic))
                        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
                }
                sink.record(&ExtractionAuditEvent::scanned(&outcome.unit, report.catalog.len()));
                units.push(report.into_unit_catalog());
            }
            Err(UnitFailure::Scan(error)) => {
                sink.record(&ExtractionAuditEvent::located(
                    &outcome.unit,
                    ExtractionOutcome::Failed,
                    &error,
                ));
                if first_failure.is_none() {
                    first_failure = Some(CliError::new(t!("extract.scan_failed", error = error)));
                }
            }
            Err(UnitFailure::Input(error)) => {
                sink.record(&ExtractionAuditEvent::new(ExtractionAuditEventParams {
                    unit: outcome.unit,
                    outcome: ExtractionOutcome::Failed,
                    message_id: None,
                    error_kind: Some("input"),
                    detail: Some(error.to_string()),
                }));
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
        }
    }
    match first_failure {
        Some(error) => Err(error),
        None => Ok(units),
    }
}

/// Resolves the catalog creation time.
///
/// An explicit RFC 3339 value wins, then `SOURCE_DATE_EPOCH` (unix seconds),
/// then the current UTC time.
fn resolve_creation_time(
    explicit: Option<&str>,
    source_date_epoch: Option<&str>,
) -> CliResult<OffsetDateTime> {
    if let Some(value) = explicit {
        return OffsetDateTime::parse(value, &Rfc3339).map_err(|err| {
            CliError::new(t!("extract.creation_date.invalid", value = value, error = err))
        });
    }
    if let Some(value) = source_date_epoch {
        let invalid = || {
            CliError::new(t!(
                "extract.source_date_epoch.invalid",
                env = SOURCE_DATE_EPOCH_ENV,
                value = value
            ))
        };
        let seconds = value.trim().parse::<i64>().map_err(|_| invalid())?;
        return OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| invalid());
    }
    Ok(OffsetDateTime::now_utc())
}

// ============================================================================
// SECTION: Render and Check Commands
// ============================================================================

/// Executes the `render` command.
fn command_render(command: &RenderCommand) -> CliResult<ExitCode> {
    let slots: Vec<MarkupElement> =
        read_json(&command.slots, &t!("input.kind.slots"), MAX_RENDER_INPUT_BYTES)?;
    let values: BTreeMap<String, Value> = match &command.expressions {
        Some(path) => read_json(path, &t!("input.kind.expressions"), MAX_RENDER_INPUT_BYTES)?,
        None => BTreeMap::new(),
    };
    let resolver = |name: &str| values.get(name).map(expression_text);
    let element = render_template(&command.template, &slots, &resolver)
        .map_err(|err| CliError::new(t!("render.failed", error = err)))?;
    let json = serde_json::to_string_pretty(&element)
        .map_err(|err| CliError::new(t!("render.serialize_failed", error = err)))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Converts a JSON placeholder value into display text.
fn expression_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let mut failed = 0_usize;
    for template in &command.templates {
        match parse(template) {
            Ok(_) => write_stdout_line(&t!("check.ok", template = template))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?,
            Err(error) => {
                failed += 1;
                write_stdout_line(&t!("check.failed", template = template, error = error))
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    if failed == 0 {
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(&t!("check.summary", failed = failed, total = command.templates.len()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::FAILURE)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and decodes a bounded JSON input file.
fn read_json<T: DeserializeOwned>(path: &Path, kind: &str, max_bytes: usize) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(error) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = error
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Resolves the CLI locale from the flag, then the environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

/// Converts CLI language selections into locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

/// Converts CLI format selections into catalog formats.
impl From<CatalogFormatArg> for CatalogFormat {
    fn from(value: CatalogFormatArg) -> Self {
        match value {
            CatalogFormatArg::Po => Self::Po,
            CatalogFormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
