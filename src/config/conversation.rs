//! Conversation lifecycle configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Conversation lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Seconds of inactivity after which an abandoned conversation is
    /// evicted on the next message for its key
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl ConversationConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_timeout_secs == 0 {
            return Err(ValidationError::InvalidIdleTimeout);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    1800
}
