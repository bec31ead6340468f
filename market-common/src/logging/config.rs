use std::env;
use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::time::{ChronoLocal, ChronoUtc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use super::json_layer::JsonLayer;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";
const UTC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub const DEFAULT_APP_NAME: &str = "asset-market";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Timestamp format for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    #[default]
    Local,
    /// ISO 8601 UTC
    Utc,
    None,
}

impl TimestampFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "utc" => TimestampFormat::Utc,
            "none" | "off" => TimestampFormat::None,
            _ => TimestampFormat::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub timestamps: TimestampFormat,
    /// Filter used when `RUST_LOG` is not set
    pub default_level: String,
    /// Include source file and line
    pub include_location: bool,
    pub include_thread_ids: bool,
    /// Include the module path
    pub include_target: bool,
    /// Application name for JSON logs
    pub app_name: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            timestamps: TimestampFormat::Local,
            default_level: "warn".to_string(),
            include_location: false,
            include_thread_ids: false,
            include_target: true,
            app_name: None,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| s == "true" || s == "1")
        .unwrap_or(default)
}

impl LogConfig {
    /// Build from `LOG_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
            timestamps: env::var("LOG_TIMESTAMPS")
                .map(|s| TimestampFormat::parse(&s))
                .unwrap_or_default(),
            default_level: env::var("LOG_LEVEL").unwrap_or(defaults.default_level),
            include_location: env_flag("LOG_LOCATION", defaults.include_location),
            include_thread_ids: env_flag("LOG_THREAD_IDS", defaults.include_thread_ids),
            include_target: defaults.include_target,
            app_name: env::var("LOG_APP_NAME").ok(),
        }
    }

    /// JSON lines with UTC timestamps, for log shipping.
    pub fn json() -> Self {
        Self {
            format: LogFormat::Json,
            timestamps: TimestampFormat::Utc,
            include_location: true,
            ..Default::default()
        }
    }

    pub fn compact() -> Self {
        Self {
            format: LogFormat::Compact,
            ..Default::default()
        }
    }

    /// Set the application name unless one is already configured
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        if self.app_name.is_none() {
            self.app_name = Some(name.into());
        }
        self
    }

    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let layer = match config.format {
        LogFormat::Json => JsonLayer::new(
            config.app_name.clone(),
            config.include_location,
            config.include_thread_ids,
            config.timestamps == TimestampFormat::Utc,
        )
        .boxed(),
        LogFormat::Compact => fmt_layer(&config, true),
        LogFormat::Pretty => fmt_layer(&config, false),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(env_filter))
        .try_init()?;

    Ok(())
}

fn fmt_layer(config: &LogConfig, compact: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_ids)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_ansi(io::stderr().is_terminal());

    match (config.timestamps, compact) {
        (TimestampFormat::Local, false) => base
            .with_timer(ChronoLocal::new(LOCAL_TIME_FORMAT.to_string()))
            .boxed(),
        (TimestampFormat::Local, true) => base
            .compact()
            .with_timer(ChronoLocal::new(LOCAL_TIME_FORMAT.to_string()))
            .boxed(),
        (TimestampFormat::Utc, false) => base
            .with_timer(ChronoUtc::new(UTC_TIME_FORMAT.to_string()))
            .boxed(),
        (TimestampFormat::Utc, true) => base
            .compact()
            .with_timer(ChronoUtc::new(UTC_TIME_FORMAT.to_string()))
            .boxed(),
        (TimestampFormat::None, false) => base.without_time().boxed(),
        (TimestampFormat::None, true) => base.compact().without_time().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn test_timestamp_format_parse() {
        assert_eq!(TimestampFormat::parse("UTC"), TimestampFormat::Utc);
        assert_eq!(TimestampFormat::parse("off"), TimestampFormat::None);
        assert_eq!(TimestampFormat::parse("local"), TimestampFormat::Local);
    }

    #[test]
    fn test_presets() {
        let json = LogConfig::json();
        assert_eq!(json.format, LogFormat::Json);
        assert_eq!(json.timestamps, TimestampFormat::Utc);
        assert!(json.include_location);

        let compact = LogConfig::compact();
        assert_eq!(compact.format, LogFormat::Compact);
        assert!(!compact.include_thread_ids);
    }

    #[test]
    fn test_app_name_keeps_configured_value() {
        let config = LogConfig {
            app_name: Some("from-env".to_string()),
            ..Default::default()
        }
        .with_app_name(DEFAULT_APP_NAME)
        .with_default_level("debug");

        assert_eq!(config.app_name.as_deref(), Some("from-env"));
        assert_eq!(config.default_level, "debug");

        let named = LogConfig::default().with_app_name(DEFAULT_APP_NAME);
        assert_eq!(named.app_name.as_deref(), Some(DEFAULT_APP_NAME));
    }
}
