//! Logging bootstrap for the viewport.
//!
//! Built on the tracing ecosystem: an env-filtered registry, formatted stderr
//! output, and optional daily-rolling file output.
//!
//! # Environment Variables
//!
//! - `BACKSCROLL_LOG`: filter directive (like `RUST_LOG`), e.g. `backscroll=debug`
//! - `BACKSCROLL_LOG_FORMAT`: stderr format: `pretty`, `json`, `compact`
//! - `BACKSCROLL_LOG_DIR`: directory for file logging (default `~/.backscroll/logs`)
//!
//! # Example
//!
//! ```no_run
//! use backscroll_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(Some(LoggingConfig::new().with_level("debug")))?;
//! # Ok::<(), backscroll_core::Error>(())
//! ```

use crate::error::{Error, Result};

use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    /// Get the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level for stderr output.
    pub level: String,
    /// Output format for stderr; `None` selects by TTY detection.
    pub format: Option<LogFormat>,
    /// Also write JSON logs to a daily-rolling file.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: None, file: false }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Enable file logging.
    pub fn with_file_logging(mut self) -> Self {
        self.file = true;
        self
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("BACKSCROLL_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("BACKSCROLL_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if let Some(format) = self.format {
            return format;
        }

        if atty::is(atty::Stream::Stderr) { LogFormat::Pretty } else { LogFormat::Compact }
    }

    /// Get the log directory path.
    fn log_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = env::var("BACKSCROLL_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".backscroll").join("logs"))
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the file appender's worker guard when file logging is enabled;
/// keep it alive for the life of the process or buffered lines are lost.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>> {
    let config = config.unwrap_or_default();
    let env_filter = config.build_env_filter();
    let format = config.detect_format();

    let registry = Registry::default().with(env_filter);

    if config.file {
        let log_dir = LoggingConfig::log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "backscroll.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match format {
            LogFormat::Pretty => {
                registry
                    .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
            LogFormat::Json => {
                registry
                    .with(fmt::layer().json().with_writer(io::stderr))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
            LogFormat::Compact => {
                registry
                    .with(fmt::layer().compact().with_writer(io::stderr))
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .init();
            }
        }

        Ok(Some(guard))
    } else {
        match format {
            LogFormat::Pretty => {
                registry.with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true)).init();
            }
            LogFormat::Json => {
                registry.with(fmt::layer().json().with_writer(io::stderr)).init();
            }
            LogFormat::Compact => {
                registry.with(fmt::layer().compact().with_writer(io::stderr)).init();
            }
        }

        Ok(None)
    }
}
