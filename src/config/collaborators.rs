//! External collaborator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for calls to external collaborators (crew directory,
/// calendar probe)
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorsConfig {
    /// Ceiling in seconds on any single collaborator call; elapsing it
    /// is treated as the collaborator being unavailable
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl CollaboratorsConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate collaborator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.call_timeout_secs == 0 || self.call_timeout_secs > 300 {
            return Err(ValidationError::InvalidCallTimeout);
        }
        Ok(())
    }
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_call_timeout() -> u64 {
    30
}
