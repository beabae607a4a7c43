//! Calendar Probe Port - connection status and availability search.
//!
//! The engine forwards the user's raw window description; how the probe
//! interprets it and talks to the provider is the adapter's concern.
//! Zero results is a domain outcome, distinct from the probe being
//! unreachable.

use async_trait::async_trait;

use crate::domain::auto_sync::CandidateSlot;
use crate::domain::foundation::UserId;

/// Errors from the calendar probe.
#[derive(Debug, thiserror::Error)]
pub enum CalendarProbeError {
    #[error("Calendar unavailable: {0}")]
    Unavailable(String),
}

/// Port for consulting the user's connected calendar.
#[async_trait]
pub trait CalendarProbe: Send + Sync {
    /// Reports whether the user has a connected calendar.
    async fn is_connected(&self, user_id: &UserId) -> Result<bool, CalendarProbeError>;

    /// Searches availability in the described window.
    ///
    /// Returns candidate slots ranked best-first; empty when nothing in
    /// the window is open (including when the description is not
    /// understood).
    async fn search(
        &self,
        user_id: &UserId,
        window_description: &str,
    ) -> Result<Vec<CandidateSlot>, CalendarProbeError>;
}
