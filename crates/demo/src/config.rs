//! Demo configuration loaded from environment variables.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MEETUP_DEMO_NOW is not an RFC 3339 instant: {value}")]
    InvalidNow {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("MEETUP_DEMO_LOG_FORMAT must be `text` or `json`, got {0}")]
    UnknownLogFormat(String),
}

/// How log lines are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `MEETUP_DEMO_NOW`: RFC 3339 instant to pin the clock to (default: real time)
/// - `MEETUP_DEMO_PRETTY`: pretty-print event JSON (default: `false`)
/// - `MEETUP_DEMO_LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `MEETUP_DEMO_METRICS`: print rendered metrics at exit (default: `false`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub now: Option<DateTime<Utc>>,
    pub pretty: bool,
    pub log_format: LogFormat,
    pub print_metrics: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let now = lookup("MEETUP_DEMO_NOW")
            .map(|value| match DateTime::parse_from_rfc3339(&value) {
                Ok(instant) => Ok(instant.with_timezone(&Utc)),
                Err(source) => Err(ConfigError::InvalidNow { value, source }),
            })
            .transpose()?;

        let log_format = match lookup("MEETUP_DEMO_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::UnknownLogFormat(other.to_string())),
        };

        Ok(Self {
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            now,
            pretty: flag(lookup("MEETUP_DEMO_PRETTY")),
            log_format,
            print_metrics: flag(lookup("MEETUP_DEMO_METRICS")),
        })
    }
}

fn flag(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("true" | "1"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            now: None,
            pretty: false,
            log_format: LogFormat::Text,
            print_metrics: false,
        }
    }
}
