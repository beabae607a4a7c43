//! In-Memory Crew Directory Adapter
//!
//! Keeps each user's crews in a process-local map. Useful for testing
//! and development; a production directory would sit on the account
//! database behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auto_sync::Crew;
use crate::domain::foundation::UserId;
use crate::ports::{CrewDirectory, CrewDirectoryError};

/// In-memory crew directory keyed by user.
#[derive(Debug, Clone)]
pub struct InMemoryCrewDirectory {
    // Registration order is kept; duplicates by name resolve
    // last-created-wins.
    crews: Arc<RwLock<HashMap<UserId, Vec<Crew>>>>,
}

impl InMemoryCrewDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self {
            crews: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a crew for a user.
    pub async fn register(&self, user_id: UserId, crew: Crew) {
        let mut crews = self.crews.write().await;
        crews.entry(user_id).or_default().push(crew);
    }
}

impl Default for InMemoryCrewDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrewDirectory for InMemoryCrewDirectory {
    async fn find_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<Crew>, CrewDirectoryError> {
        let crews = self.crews.read().await;
        Ok(crews.get(user_id).and_then(|list| {
            list.iter().rev().find(|crew| crew.name_matches(name)).cloned()
        }))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Crew>, CrewDirectoryError> {
        let crews = self.crews.read().await;
        let mut list = crews.get(user_id).cloned().unwrap_or_default();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(list)
    }
}
