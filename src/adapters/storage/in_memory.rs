//! In-Memory Conversation Store Adapter
//!
//! Holds conversation state in a process-local map. Useful for testing,
//! development, and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auto_sync::ConversationState;
use crate::domain::foundation::ConversationKey;
use crate::ports::{ConversationStore, ConversationStoreError};

/// In-memory store for per-(user, correspondent) conversation state.
#[derive(Debug, Clone)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<HashMap<ConversationKey, ConversationState>>>,
}

impl InMemoryConversationStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of active conversations
    pub async fn active_count(&self) -> usize {
        self.states.read().await.len()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<ConversationState>, ConversationStoreError> {
        let states = self.states.read().await;
        Ok(states.get(key).cloned())
    }

    async fn save(
        &self,
        key: &ConversationKey,
        state: &ConversationState,
    ) -> Result<(), ConversationStoreError> {
        let mut states = self.states.write().await;
        states.insert(key.clone(), state.clone());
        Ok(())
    }

    async fn clear(&self, key: &ConversationKey) -> Result<(), ConversationStoreError> {
        let mut states = self.states.write().await;
        states.remove(key);
        Ok(())
    }
}
