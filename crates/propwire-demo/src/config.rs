//! Demo configuration from the environment.
//!
//! | Variable              | Values            | Default  |
//! |-----------------------|-------------------|----------|
//! | `PROPWIRE_DEMO_JSON`  | `1` `true` `yes` `on` | off  |
//! | `PROPWIRE_LOG_FORMAT` | `pretty` \| `json` | `pretty` |
//!
//! Record dispatch settings (`PROPWIRE_DISPATCH`, `PROPWIRE_TRACE_SPANS`) are
//! read by [`RecordConfig::from_env_with`].

use propwire_runtime::{RecordConfig, env_flag};

/// Environment variable: print the final person as JSON.
pub const JSON_ENV: &str = "PROPWIRE_DEMO_JSON";

/// Environment variable: log output format.
pub const LOG_FORMAT_ENV: &str = "PROPWIRE_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Demo run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoConfig {
    /// Print the final person as JSON after the walkthrough.
    pub print_json: bool,
    /// Log output format.
    pub log_format: LogFormat,
    /// Settings for the person record.
    pub record: RecordConfig,
}

impl DemoConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read configuration through `get_env`.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let print_json = get_env(JSON_ENV).is_some_and(|v| env_flag(&v));
        let log_format = get_env(LOG_FORMAT_ENV)
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or_default();
        Self {
            print_json,
            log_format,
            record: RecordConfig::from_env_with(&get_env),
        }
    }
}
