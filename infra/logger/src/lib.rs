//! # Logger
//!
//! Diagnostics setup for the runner binary.
//!
//! Console output goes to **stderr**, so whatever a command prints on stdout (help text,
//! directory trees, HTTP bodies) stays pipeable. An optional log directory adds a plain or
//! JSON file sink written through a non-blocking worker.
//!
//! `RUST_LOG` still wins over the programmatic level when it is set.
//!
//! ## Example
//!
//! ```rust
//! # use folio_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("run")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    directory: Option<PathBuf>,
    level: LevelFilter,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { console: true, directory: None, level: LevelFilter::WARN, json: false, env_filter: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

/// A builder for configuring and installing the global tracing subscriber.
///
/// A name is mandatory before [`LoggerBuilder::init`] becomes available; it prefixes
/// the log file (`run.log`).
#[derive(Debug)]
pub struct LoggerBuilder<N = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    /// Minimum level emitted when `RUST_LOG` is not set.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit filter (e.g., `folio_run=debug,reqwest=warn`).
    ///
    /// Invalid filters make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables the stderr console output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes an additional log file into `directory`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.directory = Some(directory.into());
        self
    }

    /// Switches the file sink to JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until exit so the file worker can flush.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, an invalid filter, or
    ///   when no sink is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if !self.config.console && self.config.directory.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging sink enabled. Enable the console or set a directory.".into(),
                context: None,
            });
        }

        let env_filter = build_env_filter(&self.config)?;
        let mut layers = Vec::new();

        if self.config.console {
            layers.push(
                layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .boxed(),
            );
        }

        let guard = if let Some(directory) = self.config.directory {
            fs::create_dir_all(&directory).map_err(|source| LoggerError::Io {
                source,
                context: Some(format!("Failed to create {}", directory.display()).into()),
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(directory)?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = layer().with_writer(writer).with_ansi(false);

            layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log file worker."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder().name("run").level(LevelFilter::INFO).init().unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Returns the file worker guard, if a log directory was configured.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

/// Parses a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`), case-insensitive.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for any other value.
pub fn parse_level(value: &str) -> Result<LevelFilter, LoggerError> {
    value.trim().parse::<LevelFilter>().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{value}'").into(),
        context: Some("expected off, error, warn, info, debug or trace".into()),
    })
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_warn_on_console() {
        let builder = Logger::builder().name("run");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::WARN);
        assert!(builder.config.directory.is_none());
        assert!(!builder.config.json);
    }

    #[test]
    fn empty_name_is_rejected_before_install() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let err = Logger::builder().name("run").env_filter("folio=loud").init().unwrap_err();
        assert!(err.to_string().contains("Invalid env filter"), "got: {err}");
    }

    #[test]
    fn no_sink_is_rejected() {
        let err = Logger::builder().name("run").console(false).init().unwrap_err();
        assert!(err.to_string().contains("No logging sink"), "got: {err}");
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" warn ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(parse_level("loud").is_err());
    }
}
