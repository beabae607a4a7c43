//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Idle timeout must be nonzero")]
    InvalidIdleTimeout,

    #[error("Collaborator call timeout must be between 1 and 300 seconds")]
    InvalidCallTimeout,

    #[error("Log filter directive is empty")]
    EmptyLogFilter,
}
