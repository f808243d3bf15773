//! # Logging Utilities
//!
//! Logging infrastructure for Objtab using `tracing`.
//!
//! Query results go to stdout, so console logging is written to stderr and
//! file logging can replace the console entirely.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use objtab_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=objtab_core=trace`)
//! - `OBJTAB_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `OBJTAB_LOG_FILE`: Optional path to a log file, written in addition to stderr
//!
//! ## Examples
//!
//! ```rust,no_run
//! use objtab_utils::{LogFormat, LogLevel, init_logging_with_level};
//!
//! init_logging_with_level(LogLevel::Debug, LogFormat::Json).expect("Failed to initialize logging");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_VAR: &str = "OBJTAB_LOG_FORMAT";
/// Environment variable naming an additional log file.
pub const LOG_FILE_VAR: &str = "OBJTAB_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON lines, for log collectors
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "text" | "dev" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (every skipped report line)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize logging with default settings
///
/// Reads `RUST_LOG`, `OBJTAB_LOG_FORMAT` and `OBJTAB_LOG_FILE`. An unknown
/// format falls back to pretty output.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the log file
/// directory cannot be created.
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var(LOG_FORMAT_VAR)
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    init_console(format, default_level)
}

/// Initialize logging with explicit level and format
///
/// `RUST_LOG` directives still take precedence when set.
///
/// ## Errors
///
/// Returns an error if logging is already initialized.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging in `dir`
///
/// Nothing is written to the terminal, so query output can be piped into
/// other tools untouched. The file is named `YYYY-MM-DD-objtab.log` and the
/// directory is created if needed.
///
/// ## Arguments
///
/// * `dir` - Directory for the log file.
/// * `level` - Optional log level. If `None`, uses `RUST_LOG` or defaults to `INFO`.
///
/// ## Example
///
/// ```rust,no_run
/// use objtab_utils::{LogLevel, init_logging_to_dir};
///
/// let path = init_logging_to_dir("/tmp/objtab".as_ref(), Some(LogLevel::Debug))
///     .expect("Failed to initialize file logging");
/// println!("logging to {}", path.display());
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the directory cannot be created.
pub fn init_logging_to_dir(dir: &Path, level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let today = Utc::now().format("%Y-%m-%d");
    std::fs::create_dir_all(dir)?;
    let log_file = dir.join(format!("{today}-objtab.log"));

    // Priority: explicit level, then RUST_LOG, then INFO.
    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
    };

    // The date is already in the file name, so no rotation.
    let writer = file_writer(&log_file, false)?;
    Registry::default()
        .with(file_layer(writer, LogFormat::Pretty, filter))
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;
    Ok(log_file)
}

fn init_console(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let console = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter())
            .boxed(),
    };

    let file = match env::var(LOG_FILE_VAR).ok().map(PathBuf::from) {
        Some(path) => Some(file_layer(file_writer(&path, true)?, format, filter())),
        None => None,
    };

    Registry::default()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

/// Non-blocking writer for `path`, optionally rotated daily.
///
/// The worker guard is leaked: logging lives for the whole process and the
/// guard must not be dropped before the last event is flushed.
fn file_writer(path: &Path, daily: bool) -> Result<NonBlocking, LoggingError>
{
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;

    let appender = if daily {
        tracing_appender::rolling::daily(directory, file_name)
    } else {
        tracing_appender::rolling::never(directory, file_name)
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    std::mem::forget(guard);
    Ok(writer)
}

fn file_layer<S>(writer: NonBlocking, format: LogFormat, filter: EnvFilter) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Log file path has no file name
    #[error("Invalid log file path: {0}")]
    InvalidPath(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
