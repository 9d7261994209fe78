//! Service configuration
//!
//! Read once from the environment at startup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::conversion::PrecisionContext;

/// Largest batch accepted by the service unless overridden
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

pub const ENV_MAX_BATCH_SIZE: &str = "TEMPCONV_MAX_BATCH_SIZE";
pub const ENV_DEFAULT_PRECISION: &str = "TEMPCONV_DEFAULT_PRECISION";
pub const ENV_LOG: &str = "TEMPCONV_LOG";

/// Filter used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "tempconv=info";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidBatchSize { name: &'static str, value: String },

    #[error("{name} must be one of consumer, industrial, medical, scientific, got '{value}'")]
    InvalidPrecision { name: &'static str, value: String },

    #[error("Invalid log filter '{value}': {reason}")]
    InvalidLogFilter { value: String, reason: String },
}

/// Runtime configuration for the conversion service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Upper bound on items per batch request
    pub max_batch_size: usize,
    /// Precision applied when a request names none
    pub default_precision: PrecisionContext,
    /// Extra tracing filter directive
    pub log_filter: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            default_precision: PrecisionContext::default(),
            log_filter: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(lookup(ENV_MAX_BATCH_SIZE)) {
            config.max_batch_size = match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidBatchSize {
                        name: ENV_MAX_BATCH_SIZE,
                        value,
                    })
                }
            };
        }

        if let Some(value) = non_empty(lookup(ENV_DEFAULT_PRECISION)) {
            config.default_precision =
                PrecisionContext::from_str(&value).ok_or(ConfigError::InvalidPrecision {
                    name: ENV_DEFAULT_PRECISION,
                    value,
                })?;
        }

        config.log_filter = non_empty(lookup(ENV_LOG));

        Ok(config)
    }

    /// Build the tracing filter
    ///
    /// `rust_log` (the RUST_LOG value) replaces the default filter when set;
    /// the configured `log_filter` directive is added on top of either.
    pub fn env_filter(&self, rust_log: Option<&str>) -> Result<EnvFilter, ConfigError> {
        let base = rust_log
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER);
        let mut filter = EnvFilter::try_new(base).map_err(|e| ConfigError::InvalidLogFilter {
            value: base.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(directive) = &self.log_filter {
            let directive = directive.parse().map_err(|e: tracing_subscriber::filter::ParseError| {
                ConfigError::InvalidLogFilter {
                    value: directive.clone(),
                    reason: e.to_string(),
                }
            })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
