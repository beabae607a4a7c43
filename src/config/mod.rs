//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `AUTO_SYNC` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use auto_sync::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.telemetry.init();
//! ```

mod collaborators;
mod conversation;
mod error;
mod telemetry;

pub use collaborators::CollaboratorsConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults, so a bare environment loads a
/// usable development configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Conversation lifecycle (idle timeout)
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// External collaborator call ceilings
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AUTO_SYNC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AUTO_SYNC__CONVERSATION__IDLE_TIMEOUT_SECS=900`
    /// - `AUTO_SYNC__COLLABORATORS__CALL_TIMEOUT_SECS=10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUTO_SYNC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.conversation.validate()?;
        self.collaborators.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
