//! # Logging Infrastructure
//!
//! Structured logging with tracing.
//!
//! Logs always go to standard error, so command output on standard output
//! stays machine readable. An optional log file receives a copy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use keyroute::logging::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```
//!
//! ## Sensitive Data Redaction
//!
//! ```
//! use keyroute::logging::redact_sensitive;
//!
//! assert_eq!(redact_sensitive("tok-1234567890abcdef"), "tok-***cdef");
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error type for logging initialization failures.
#[derive(Debug)]
pub enum LogError {
    /// Failed to create log file or directory
    FileCreation(String),
    /// Failed to initialize the subscriber
    SubscriberInit(String),
    /// Invalid configuration
    InvalidConfig(String),
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCreation(msg) => write!(f, "Failed to create log file: {msg}"),
            Self::SubscriberInit(msg) => write!(f, "Failed to initialize logging: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid log configuration: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

/// Log level configuration.
///
/// Each level includes all messages from more severe levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Most verbose: trace, debug, info, warn, error
    Trace,
    /// Verbose: debug, info, warn, error
    Debug,
    /// Standard: info, warn, error
    Info,
    /// Quiet: warn, error
    #[default]
    Warn,
    /// Quietest: error only
    Error,
}

impl LogLevel {
    /// Convert to tracing Level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Get the string representation for env filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format (default).
    #[default]
    Pretty,
    /// JSON structured format.
    Json,
    /// Compact single-line format.
    Compact,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(LogError::InvalidConfig(format!(
                "unknown log format '{other}', expected pretty, json or compact"
            ))),
        }
    }
}

/// Configuration for the logging system.
///
/// # Example
///
/// ```
/// use keyroute::logging::{LogConfig, LogFormat, LogLevel};
///
/// let config = LogConfig {
///     level: LogLevel::Debug,
///     format: LogFormat::Json,
///     ..Default::default()
/// };
/// assert!(config.file_path.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum severity. Defaults to [`LogLevel::Warn`].
    pub level: LogLevel,

    /// Output format. Defaults to [`LogFormat::Pretty`].
    pub format: LogFormat,

    /// Optional log file, written in addition to standard error.
    ///
    /// The directory will be created if it doesn't exist.
    pub file_path: Option<PathBuf>,
}

/// Guard that flushes logs on drop.
///
/// Keep it alive for the duration of the program so the file appender
/// flushes on shutdown.
pub struct LogGuard {
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LogGuard {
    const fn new(guard: Option<tracing_appender::non_blocking::WorkerGuard>) -> Self {
        Self { guard }
    }
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

/// Initialize the logging system.
///
/// `RUST_LOG` overrides the configured level when set.
///
/// # Errors
///
/// Returns [`LogError`] if:
/// - The log file directory cannot be created
/// - The subscriber cannot be initialized (e.g., already initialized)
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(config.level.as_str()),
    }
    .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

    let (file_writer, guard) = if let Some(ref path) = config.file_path {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        std::fs::create_dir_all(dir)
            .map_err(|e| LogError::FileCreation(format!("{}: {}", dir.display(), e)))?;

        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LogError::InvalidConfig("Invalid log file name".to_string()))?;

        let file_appender = tracing_appender::rolling::never(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        (Some(non_blocking), Some(guard))
    } else {
        (None, None)
    };

    match config.format {
        LogFormat::Pretty => {
            let stderr_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true);
            let file_layer = file_writer.map(|writer| {
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::SubscriberInit(e.to_string()))?;
        }
        LogFormat::Json => {
            let stderr_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true);
            let file_layer =
                file_writer.map(|writer| fmt::layer().json().with_writer(writer).with_target(true));

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::SubscriberInit(e.to_string()))?;
        }
        LogFormat::Compact => {
            let stderr_layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true);
            let file_layer = file_writer.map(|writer| {
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
            });

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::SubscriberInit(e.to_string()))?;
        }
    }

    Ok(LogGuard::new(guard))
}

/// Redact sensitive data for display.
///
/// # Rules
///
/// - Values shorter than 12 characters are fully redacted to `***`
/// - Longer values show: first 4 chars + `***` + last 4 chars
///
/// # Example
///
/// ```
/// use keyroute::logging::redact_sensitive;
///
/// assert_eq!(redact_sensitive("sk-1234567890abcdef"), "sk-1***cdef");
/// assert_eq!(redact_sensitive("secret"), "***");
/// assert_eq!(redact_sensitive(""), "***");
/// ```
#[must_use]
pub fn redact_sensitive(value: &str) -> String {
    const MIN_LENGTH_FOR_PARTIAL: usize = 12;
    const VISIBLE_CHARS: usize = 4;

    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len < MIN_LENGTH_FOR_PARTIAL {
        return "***".to_string();
    }

    let prefix: String = chars.iter().take(VISIBLE_CHARS).collect();
    let suffix: String = chars.iter().skip(len - VISIBLE_CHARS).collect();

    format!("{prefix}***{suffix}")
}

/// Convert verbosity count to `LogLevel`.
///
/// | Verbosity | Level |
/// |-----------|-------|
/// | 0         | Warn  |
/// | 1         | Info  |
/// | 2         | Debug |
/// | 3+        | Trace |
///
/// # Example
///
/// ```
/// use keyroute::logging::{verbosity_to_level, LogLevel};
///
/// assert_eq!(verbosity_to_level(0), LogLevel::Warn);
/// assert_eq!(verbosity_to_level(2), LogLevel::Debug);
/// assert_eq!(verbosity_to_level(100), LogLevel::Trace);
/// ```
#[must_use]
pub const fn verbosity_to_level(verbosity: u8) -> LogLevel {
    match verbosity {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}
