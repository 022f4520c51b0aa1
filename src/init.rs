use crate::env::{env_or, is_truthy, LOG_COLORS_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV, LOG_SILENT_ENV};
use crate::format::{Colorize, ErrorFields, Pipeline, Timestamp};
use crate::layer::Logger;
use crate::output::DEFAULT_FORMAT;
use crate::sink::StdoutSink;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Logger configuration, captured once at startup.
///
/// **Fields**
/// - `level`: most verbose level that is written.
/// - `format`: name looked up in the [`FormatTable`]; unknown names use
///   `default`.
/// - `silent`: drop every record.
/// - `colors`: add the [`Colorize`] stage to the pipeline.
///
/// [`FormatTable`]: crate::output::FormatTable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub format: String,
    pub silent: bool,
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: DEFAULT_FORMAT.to_string(),
            silent: false,
            colors: false,
        }
    }
}

impl LoggerConfig {
    /// Read `LOG_LEVEL`, `LOG_FORMAT`, `LOG_SILENT` and `LOG_COLORS` from
    /// the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| Some(env_or(key, "")))
    }

    /// Build a config from any key lookup.
    ///
    /// Missing, empty or unparseable values silently keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            level: get(LOG_LEVEL_ENV)
                .and_then(|v| parse_level(&v).ok())
                .unwrap_or(defaults.level),
            format: get(LOG_FORMAT_ENV).unwrap_or(defaults.format),
            silent: get(LOG_SILENT_ENV).map(|v| is_truthy(&v)).unwrap_or(defaults.silent),
            colors: get(LOG_COLORS_ENV).map(|v| is_truthy(&v)).unwrap_or(defaults.colors),
        }
    }

    /// Formatting stages in order: error hoisting, optional colors,
    /// timestamp.
    pub fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.push(ErrorFields::new(true));
        if self.colors {
            pipeline.push(Colorize);
        }
        pipeline.push(Timestamp::default());
        pipeline
    }
}

/// Error returned by [`parse_level`] for names it does not know.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level {0:?}")]
pub struct ParseLevelError(pub String);

/// Parse a level name, case-insensitively and ignoring surrounding
/// whitespace.
///
/// Besides the `tracing` names this accepts `none`, `warning`, `http`,
/// `verbose` and `silly`.
pub fn parse_level(name: &str) -> Result<LevelFilter, ParseLevelError> {
    let level = match name.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "info" | "http" => LevelFilter::INFO,
        "debug" | "verbose" => LevelFilter::DEBUG,
        "trace" | "silly" => LevelFilter::TRACE,
        _ => return Err(ParseLevelError(name.to_string())),
    };
    Ok(level)
}

/// Error type returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Assemble a logger writing to standard output.
pub fn build_logger(config: &LoggerConfig) -> Logger {
    Logger::with_sink(config, Arc::new(StdoutSink))
}

/// Install a logger built from `config` as the global `tracing`
/// subscriber.
///
/// **Errors**
/// - [`InitError::AlreadyInstalled`] if a global subscriber was set
///   before. The existing subscriber stays in place.
pub fn init_with_config(config: LoggerConfig) -> Result<(), InitError> {
    let subscriber = Registry::default().with(build_logger(&config));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install the global logger configured from the environment.
///
/// Equivalent to `init_with_config(LoggerConfig::from_env())`. This is the
/// recommended entrypoint for binaries.
pub fn init() -> Result<(), InitError> {
    init_with_config(LoggerConfig::from_env())
}
