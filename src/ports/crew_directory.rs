//! Crew Directory Port - read-only crew resolution.
//!
//! "Not found" is a domain outcome (`Ok(None)` / empty list), distinct
//! from the directory being unreachable, which is an error. The engine
//! branches differently on the two.

use async_trait::async_trait;

use crate::domain::auto_sync::Crew;
use crate::domain::foundation::UserId;

/// Errors from the crew directory.
#[derive(Debug, thiserror::Error)]
pub enum CrewDirectoryError {
    #[error("Crew directory unavailable: {0}")]
    Unavailable(String),
}

/// Port for resolving a user's crews.
#[async_trait]
pub trait CrewDirectory: Send + Sync {
    /// Finds a crew by name for a user, matching case-insensitively.
    ///
    /// Returns `Ok(None)` when no crew matches.
    async fn find_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<Crew>, CrewDirectoryError>;

    /// Lists a user's crews ordered by display name. May be empty.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Crew>, CrewDirectoryError>;
}
