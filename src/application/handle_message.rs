//! Handle Message use case.
//!
//! Drives one inbound message through load, decide, and persist. Access
//! is serialized per (user, correspondent) key so concurrent messages on
//! the same thread never interleave a read-decide-write cycle; distinct
//! keys proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::application::dto::{CallerRole, InboundMessage, OutboundResponse};
use crate::domain::auto_sync::{AutoSyncEngine, StateTransition};
use crate::domain::foundation::{
    ConversationKey, CorrespondentId, Timestamp, UserId, ValidationError,
};
use crate::ports::{CalendarProbe, ConversationStore, ConversationStoreError, CrewDirectory};

/// Errors from the message-handling service.
#[derive(Debug, thiserror::Error)]
pub enum HandleMessageError {
    /// The inbound payload carried an unusable identifier.
    #[error("Invalid inbound message: {0}")]
    InvalidMessage(#[from] ValidationError),

    /// The conversation store failed.
    #[error("Conversation store failed: {0}")]
    Store(#[from] ConversationStoreError),
}

/// Application service for one inbound message.
pub struct HandleMessageService<S, D, P>
where
    S: ConversationStore,
    D: CrewDirectory,
    P: CalendarProbe,
{
    store: Arc<S>,
    engine: AutoSyncEngine<D, P>,
    idle_timeout_secs: u64,
    locks: Mutex<HashMap<ConversationKey, Arc<Mutex<()>>>>,
}

impl<S, D, P> HandleMessageService<S, D, P>
where
    S: ConversationStore,
    D: CrewDirectory,
    P: CalendarProbe,
{
    pub fn new(store: Arc<S>, engine: AutoSyncEngine<D, P>, idle_timeout_secs: u64) -> Self {
        Self {
            store,
            engine,
            idle_timeout_secs,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handles one inbound message for the given user.
    ///
    /// Returns `Ok(None)` when the message is not part of an Auto Sync
    /// conversation (including invitee messages) and normal chat
    /// handling should proceed.
    #[instrument(skip(self, inbound), fields(correspondent = %inbound.correspondent_id))]
    pub async fn handle(
        &self,
        user_id: &UserId,
        inbound: &InboundMessage,
    ) -> Result<Option<OutboundResponse>, HandleMessageError> {
        // Only the host drives the negotiation; invitee replies are a
        // different flow.
        if inbound.caller_role == CallerRole::Invitee {
            return Ok(None);
        }

        let correspondent_id = CorrespondentId::new(inbound.correspondent_id.as_str())?;
        let key = ConversationKey::new(user_id.clone(), correspondent_id);

        let guard = self.lock_for(&key).await.lock_owned().await;

        let state = match self.store.load(&key).await? {
            Some(state) if state.is_idle_expired(&Timestamp::now(), self.idle_timeout_secs) => {
                info!(key = %key, "evicting idle conversation");
                self.store.clear(&key).await?;
                None
            }
            other => other,
        };
        let had_state = state.is_some();

        let outcome = self
            .engine
            .handle(&key, &inbound.message_text, state)
            .await;

        let conversation_remains = match &outcome.transition {
            StateTransition::Save(new_state) => {
                debug_assert!(new_state.invariants_hold());
                self.store.save(&key, new_state).await?;
                true
            }
            StateTransition::Clear => {
                self.store.clear(&key).await?;
                false
            }
            StateTransition::None => had_state,
        };

        drop(guard);
        if !conversation_remains {
            self.release_lock_if_unused(&key).await;
        }

        debug!(
            key = %key,
            replied = outcome.reply.is_some(),
            "message handled"
        );
        Ok(outcome.reply.map(OutboundResponse::new))
    }

    /// Fetches (or creates) the mutex serializing this key's messages.
    async fn lock_for(&self, key: &ConversationKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Drops the lock entry for a key with no remaining conversation.
    ///
    /// Every user of an entry clones its `Arc` while holding the outer
    /// map mutex, so a strong count of one here means no task is waiting
    /// on it and the entry can go.
    async fn release_lock_if_unused(&self, key: &ConversationKey) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(key) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(key);
            }
        }
    }

    /// Number of per-key lock entries currently held.
    pub async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }
}
