//! In-Memory Calendar Probe Adapter
//!
//! Simulates a connected calendar for testing and development: a set of
//! connected users plus their busy events. `search` interprets the
//! window description with the natural-language window parser and
//! offers two-hour slots that dodge the busy events.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auto_sync::{parse_time_window, CandidateSlot};
use crate::domain::foundation::UserId;
use crate::ports::{CalendarProbe, CalendarProbeError};

/// Length of each offered slot, in hours.
const SLOT_HOURS: u32 = 2;

/// In-memory calendar probe with configurable connections and busy events.
#[derive(Debug, Clone)]
pub struct InMemoryCalendarProbe {
    connected: Arc<RwLock<HashSet<UserId>>>,
    busy: Arc<RwLock<HashMap<UserId, Vec<CandidateSlot>>>>,
    // Fixed reference date for deterministic window resolution in tests;
    // `None` means today.
    reference: Arc<RwLock<Option<NaiveDate>>>,
}

impl InMemoryCalendarProbe {
    /// Create a probe with no connected users
    pub fn new() -> Self {
        Self {
            connected: Arc::new(RwLock::new(HashSet::new())),
            busy: Arc::new(RwLock::new(HashMap::new())),
            reference: Arc::new(RwLock::new(None)),
        }
    }

    /// Mark a user's calendar as connected.
    pub async fn connect(&self, user_id: UserId) {
        self.connected.write().await.insert(user_id);
    }

    /// Record a busy event; searches will route around it.
    pub async fn add_busy(&self, user_id: UserId, event: CandidateSlot) {
        self.busy.write().await.entry(user_id).or_default().push(event);
    }

    /// Pin the date that relative windows resolve against.
    pub async fn set_reference_date(&self, date: NaiveDate) {
        *self.reference.write().await = Some(date);
    }

    async fn reference_date(&self) -> NaiveDate {
        self.reference
            .read()
            .await
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl Default for InMemoryCalendarProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarProbe for InMemoryCalendarProbe {
    async fn is_connected(&self, user_id: &UserId) -> Result<bool, CalendarProbeError> {
        Ok(self.connected.read().await.contains(user_id))
    }

    async fn search(
        &self,
        user_id: &UserId,
        window_description: &str,
    ) -> Result<Vec<CandidateSlot>, CalendarProbeError> {
        let reference = self.reference_date().await;
        let window = match parse_time_window(window_description, reference) {
            Some(window) => window,
            // An unintelligible window is "nothing found", not an error.
            None => return Ok(vec![]),
        };

        let busy = self.busy.read().await;
        let busy_events = busy.get(user_id).cloned().unwrap_or_default();

        let (from_hour, to_hour) = window.search_hours();
        let mut slots = Vec::new();

        let mut day = window.start_date;
        while day <= window.end_date {
            if window.includes_date(day) {
                let mut hour = from_hour;
                while hour + SLOT_HOURS <= to_hour {
                    let start = Utc.from_utc_datetime(
                        &day.and_hms_opt(hour, 0, 0)
                            .ok_or_else(|| CalendarProbeError::Unavailable(
                                format!("invalid slot hour {hour}"),
                            ))?,
                    );
                    let slot = CandidateSlot::new(start, start + Duration::hours(SLOT_HOURS as i64));
                    if !busy_events.iter().any(|b| b.overlaps(slot.start, slot.end)) {
                        slots.push(slot);
                    }
                    hour += SLOT_HOURS;
                }
            }
            day += Duration::days(1);
        }

        Ok(slots)
    }
}
