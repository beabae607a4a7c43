//! Conversation Store Port - Interface for persisting conversation state.
//!
//! Holds at most one active record per (user, correspondent) pair. The
//! application layer serializes access per key, so implementations need
//! no merge semantics.

use async_trait::async_trait;

use crate::domain::auto_sync::ConversationState;
use crate::domain::foundation::ConversationKey;

/// Errors that can occur during conversation store operations.
#[derive(Debug, thiserror::Error)]
pub enum ConversationStoreError {
    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Port for loading, saving, and clearing conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load state for a key.
    ///
    /// Returns `Ok(None)` when no conversation is active for the key.
    async fn load(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<ConversationState>, ConversationStoreError>;

    /// Save state for a key, replacing any existing record.
    async fn save(
        &self,
        key: &ConversationKey,
        state: &ConversationState,
    ) -> Result<(), ConversationStoreError>;

    /// Remove state for a key. Clearing an absent key is not an error.
    async fn clear(&self, key: &ConversationKey) -> Result<(), ConversationStoreError>;
}
