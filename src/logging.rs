//! Logging initialization
//!
//! Structured logging through `tracing`, configured from `ENUM_MIRROR_LOG_*`
//! environment variables. `RUST_LOG`, when set, replaces the level.
//!
//! Logs go to stderr so that command output (`scan --json`) stays clean on
//! stdout.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_LEVEL_ENV: &str = "ENUM_MIRROR_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "ENUM_MIRROR_LOG_FORMAT";
pub const LOG_TARGET_FILTER_ENV: &str = "ENUM_MIRROR_LOG_TARGET_FILTER";
pub const LOG_INCLUDE_LOCATION_ENV: &str = "ENUM_MIRROR_LOG_INCLUDE_LOCATION";

/// Log format: pretty for terminals, JSON for CI log collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated), e.g. `enum_mirror::upstream=debug`
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            format: lookup(LOG_FORMAT_ENV).map_or(defaults.format, |s| LogFormat::parse(&s)),
            target_filter: lookup(LOG_TARGET_FILTER_ENV).filter(|s| !s.trim().is_empty()),
            include_location: lookup(LOG_INCLUDE_LOCATION_ENV)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Level parsed from `log_level`; unknown values fall back to INFO.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Build the filter: `RUST_LOG` or the configured level, plus target directives.
    pub fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Initialize the global subscriber.
///
/// # Example
///
/// ```no_run
/// use enum_mirror::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env())
///     .expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(config.include_location)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.target_filter.is_none());
        assert!(!config.include_location);
    }

    #[test]
    fn test_log_config_from_vars() {
        let config = LogConfig::from_lookup(lookup(&[
            (LOG_LEVEL_ENV, "debug"),
            (LOG_FORMAT_ENV, "json"),
            (LOG_TARGET_FILTER_ENV, "enum_mirror::upstream=trace"),
            (LOG_INCLUDE_LOCATION_ENV, "true"),
        ]));
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.target_filter.as_deref(),
            Some("enum_mirror::upstream=trace")
        );
        assert!(config.include_location);
    }

    #[test]
    fn test_level_fallback() {
        let config = LogConfig {
            log_level: "verbose".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.level(), Level::INFO);
        let config = LogConfig::from_lookup(lookup(&[(LOG_INCLUDE_LOCATION_ENV, "yes")]));
        assert!(!config.include_location);
    }
}
