//! Telemetry configuration and tracing initialization

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use super::error::ValidationError;

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directive (tracing EnvFilter syntax)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl TelemetryConfig {
    /// Initialize the global tracing subscriber.
    ///
    /// `RUST_LOG` overrides the configured filter when set. Safe to call
    /// once per process; later calls are ignored.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_filter.clone()));

        let _ = fmt().with_env_filter(filter).try_init();
    }

    /// Validate telemetry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_filter.trim().is_empty() {
            return Err(ValidationError::EmptyLogFilter);
        }
        Ok(())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info,auto_sync=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_enables_crate_debug() {
        let config = TelemetryConfig::default();
        assert!(config.log_filter.contains("auto_sync=debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_filter_is_invalid() {
        let config = TelemetryConfig {
            log_filter: "   ".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
