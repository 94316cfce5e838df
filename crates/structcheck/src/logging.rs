//! Subscriber setup for demos and binaries built on structcheck.
//!
//! The library crates only emit `tracing` events: `trace` for each check and
//! each union or discriminator branch selection, `debug` for failed
//! validations and registry changes. Nothing is printed until a subscriber
//! is installed here.

use std::str::FromStr;

use tracing::level_filters::LevelFilter;

/// Environment variable holding the level name (`error` ... `trace`).
pub const LEVEL_VAR: &str = "STRUCTCHECK_LOG";

/// Environment variable holding the output format (`text` or `json`).
pub const FORMAT_VAR: &str = "STRUCTCHECK_LOG_FORMAT";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level `{other}`")),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Format and level picked from the environment, falling back to the given
/// defaults when a variable is unset or unrecognised.
pub fn settings_from_env(format: LogFormat, level: LogLevel) -> (LogFormat, LogLevel) {
    settings_from(
        std::env::var(FORMAT_VAR).ok().as_deref(),
        std::env::var(LEVEL_VAR).ok().as_deref(),
        format,
        level,
    )
}

fn settings_from(
    format_name: Option<&str>,
    level_name: Option<&str>,
    format: LogFormat,
    level: LogLevel,
) -> (LogFormat, LogLevel) {
    (
        format_name.and_then(|name| name.parse().ok()).unwrap_or(format),
        level_name.and_then(|name| name.parse().ok()).unwrap_or(level),
    )
}

/// Install a stderr fmt subscriber. Does nothing if one is already set.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

/// [`init_logging`] with [`LEVEL_VAR`] and [`FORMAT_VAR`] overriding the
/// defaults.
pub fn init_from_env(format: LogFormat, level: LogLevel) {
    let (format, level) = settings_from_env(format, level);
    init_logging(format, level);
}
