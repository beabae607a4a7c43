//! Conversation state record for an active Auto Sync flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::slots::CandidateSlot;
use super::Phase;
use crate::domain::foundation::{CrewId, Timestamp};

/// Errors raised when a mutation would violate a state invariant.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    /// A mutation assumed a phase the record is not in.
    #[error("Operation not valid in phase {phase:?}")]
    WrongPhase { phase: Phase },

    /// Calendar mode was already decided and cannot change.
    #[error("Calendar mode is immutable once set")]
    CalendarModeAlreadySet,

    /// "next" was requested but no further candidates remain.
    #[error("No alternate options to cycle to")]
    NoAlternateOptions,
}

/// Per-(user, correspondent) record held while Auto Sync is active.
///
/// Created on the trigger command, mutated only by the engine, and
/// removed on completion, cancellation, or idle timeout. Invariants:
/// `crew_id` is present whenever the phase is beyond `AwaitingCrew`,
/// `event_name` whenever beyond `AwaitingEventName`, and `calendar_mode`
/// never changes once decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Current position in the flow.
    pub phase: Phase,
    /// Resolved crew, set once and never cleared.
    pub crew_id: Option<CrewId>,
    /// Event name exactly as the user supplied it (trimmed).
    pub event_name: Option<String>,
    /// True when a connected calendar drives time negotiation.
    pub calendar_mode: Option<bool>,
    /// Raw time-window text from the user (calendar mode only).
    pub time_window_raw: Option<String>,
    /// Candidate currently surfaced to the user.
    pub proposed_option: Option<CandidateSlot>,
    /// Remaining candidates, cycled through on "next".
    #[serde(default)]
    pub alternate_options: Vec<CandidateSlot>,
    /// When the conversation started.
    pub created_at: Timestamp,
    /// Last inbound activity, for idle eviction.
    pub last_activity_at: Timestamp,
}

impl ConversationState {
    /// Starts a conversation waiting for a crew name.
    pub fn awaiting_crew() -> Self {
        let now = Timestamp::now();
        Self {
            phase: Phase::AwaitingCrew,
            crew_id: None,
            event_name: None,
            calendar_mode: None,
            time_window_raw: None,
            proposed_option: None,
            alternate_options: Vec::new(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Starts a conversation with the crew already resolved (the trigger
    /// carried a valid crew name).
    pub fn awaiting_event_name(crew_id: CrewId) -> Self {
        let mut state = Self::awaiting_crew();
        state.phase = Phase::AwaitingEventName;
        state.crew_id = Some(crew_id);
        state
    }

    /// Records the resolved crew and advances to event-name collection.
    pub fn resolve_crew(&mut self, crew_id: CrewId) -> Result<(), StateError> {
        if self.phase != Phase::AwaitingCrew {
            return Err(StateError::WrongPhase { phase: self.phase });
        }
        self.crew_id = Some(crew_id);
        self.phase = Phase::AwaitingEventName;
        self.touch();
        Ok(())
    }

    /// Records the event name and the calendar-mode decision, advancing
    /// to time-window collection. The mode is decided exactly once here.
    pub fn name_event(
        &mut self,
        event_name: impl Into<String>,
        calendar_mode: bool,
    ) -> Result<(), StateError> {
        if self.phase != Phase::AwaitingEventName {
            return Err(StateError::WrongPhase { phase: self.phase });
        }
        if self.calendar_mode.is_some() {
            return Err(StateError::CalendarModeAlreadySet);
        }
        self.event_name = Some(event_name.into());
        self.calendar_mode = Some(calendar_mode);
        self.phase = Phase::AwaitingTimeWindow;
        self.touch();
        Ok(())
    }

    /// Records the accepted window text, the first surfaced candidate,
    /// and any remaining candidates, advancing to proposal confirmation.
    pub fn propose(
        &mut self,
        window_raw: impl Into<String>,
        option: CandidateSlot,
        alternates: Vec<CandidateSlot>,
    ) -> Result<(), StateError> {
        if self.phase != Phase::AwaitingTimeWindow {
            return Err(StateError::WrongPhase { phase: self.phase });
        }
        self.time_window_raw = Some(window_raw.into());
        self.proposed_option = Some(option);
        self.alternate_options = alternates;
        self.phase = Phase::ProposalReady;
        self.touch();
        Ok(())
    }

    /// Surfaces the next candidate, cycling the current one to the back
    /// so repeated "next" eventually returns to it.
    pub fn next_option(&mut self) -> Result<(), StateError> {
        if self.phase != Phase::ProposalReady {
            return Err(StateError::WrongPhase { phase: self.phase });
        }
        if self.alternate_options.is_empty() {
            return Err(StateError::NoAlternateOptions);
        }
        let next = self.alternate_options.remove(0);
        if let Some(current) = self.proposed_option.replace(next) {
            self.alternate_options.push(current);
        }
        self.touch();
        Ok(())
    }

    /// Refreshes the activity timestamp without changing anything else.
    /// Used when a message is handled but the phase does not advance.
    pub fn touch(&mut self) {
        self.last_activity_at = Timestamp::now();
    }

    /// Returns true if the record has been idle longer than the timeout.
    pub fn is_idle_expired(&self, now: &Timestamp, idle_timeout_secs: u64) -> bool {
        self.last_activity_at.is_older_than(now, idle_timeout_secs)
    }

    /// Checks structural invariants; used by tests and debug assertions.
    pub fn invariants_hold(&self) -> bool {
        if self.phase.requires_crew() && self.crew_id.is_none() {
            return false;
        }
        if self.phase.requires_event_name()
            && self.event_name.as_deref().map_or(true, |n| n.trim().is_empty())
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod lifecycle {
        use super::*;

        #[test]
        fn starts_awaiting_crew_with_nothing_resolved() {
            let state = ConversationState::awaiting_crew();
            assert_eq!(state.phase, Phase::AwaitingCrew);
            assert!(state.crew_id.is_none());
            assert!(state.event_name.is_none());
            assert!(state.calendar_mode.is_none());
            assert!(state.invariants_hold());
        }

        #[test]
        fn trigger_with_crew_skips_crew_selection() {
            let crew_id = CrewId::new();
            let state = ConversationState::awaiting_event_name(crew_id);
            assert_eq!(state.phase, Phase::AwaitingEventName);
            assert_eq!(state.crew_id, Some(crew_id));
            assert!(state.invariants_hold());
        }

        #[test]
        fn full_walk_preserves_invariants() {
            let mut state = ConversationState::awaiting_crew();
            state.resolve_crew(CrewId::new()).unwrap();
            assert!(state.invariants_hold());

            state.name_event("Test Event", true).unwrap();
            assert_eq!(state.phase, Phase::AwaitingTimeWindow);
            assert_eq!(state.calendar_mode, Some(true));
            assert!(state.invariants_hold());

            let slot = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
            state
                .propose("next week evenings", slot.clone(), vec![])
                .unwrap();
            assert_eq!(state.phase, Phase::ProposalReady);
            assert_eq!(state.proposed_option, Some(slot));
            assert!(state.invariants_hold());
        }
    }

    mod option_cycling {
        use super::*;

        fn proposal_with_alternates() -> (ConversationState, Vec<CandidateSlot>) {
            let slots = vec![
                CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2),
                CandidateSlot::from_ymd_hm(2025, 12, 20, 10, 0, 2),
                CandidateSlot::from_ymd_hm(2025, 12, 21, 10, 0, 2),
            ];
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            state.name_event("Test Event", true).unwrap();
            state
                .propose("next week evenings", slots[0].clone(), slots[1..].to_vec())
                .unwrap();
            (state, slots)
        }

        #[test]
        fn next_surfaces_each_candidate_in_turn() {
            let (mut state, slots) = proposal_with_alternates();

            state.next_option().unwrap();
            assert_eq!(state.proposed_option, Some(slots[1].clone()));

            state.next_option().unwrap();
            assert_eq!(state.proposed_option, Some(slots[2].clone()));
        }

        #[test]
        fn cycling_wraps_back_to_the_first_candidate() {
            let (mut state, slots) = proposal_with_alternates();

            for _ in 0..slots.len() {
                state.next_option().unwrap();
            }

            assert_eq!(state.proposed_option, Some(slots[0].clone()));
            assert_eq!(state.alternate_options.len(), 2);
        }

        #[test]
        fn next_without_alternates_is_rejected() {
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            state.name_event("Test Event", true).unwrap();
            state
                .propose(
                    "next week evenings",
                    CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2),
                    vec![],
                )
                .unwrap();

            let result = state.next_option();
            assert!(matches!(result, Err(StateError::NoAlternateOptions)));
        }

        #[test]
        fn next_outside_proposal_ready_is_rejected() {
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            let result = state.next_option();
            assert!(matches!(result, Err(StateError::WrongPhase { .. })));
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn resolve_crew_rejected_outside_awaiting_crew() {
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            let result = state.resolve_crew(CrewId::new());
            assert!(matches!(result, Err(StateError::WrongPhase { .. })));
        }

        #[test]
        fn name_event_rejected_before_crew_resolution() {
            let mut state = ConversationState::awaiting_crew();
            let result = state.name_event("Dinner", false);
            assert!(matches!(result, Err(StateError::WrongPhase { .. })));
        }

        #[test]
        fn calendar_mode_is_immutable_once_set() {
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            state.name_event("Dinner", true).unwrap();
            // Force the phase back to simulate a buggy caller.
            state.phase = Phase::AwaitingEventName;
            let result = state.name_event("Dinner again", false);
            assert!(matches!(result, Err(StateError::CalendarModeAlreadySet)));
        }

        #[test]
        fn propose_rejected_before_time_window_phase() {
            let mut state = ConversationState::awaiting_event_name(CrewId::new());
            let slot = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
            let result = state.propose("whenever", slot, vec![]);
            assert!(matches!(result, Err(StateError::WrongPhase { .. })));
        }
    }

    mod idle_expiry {
        use super::*;

        #[test]
        fn fresh_state_is_not_expired() {
            let state = ConversationState::awaiting_crew();
            let now = Timestamp::now();
            assert!(!state.is_idle_expired(&now, 1800));
        }

        #[test]
        fn stale_state_is_expired() {
            let mut state = ConversationState::awaiting_crew();
            state.last_activity_at = Timestamp::now().minus_secs(3600);
            let now = Timestamp::now();
            assert!(state.is_idle_expired(&now, 1800));
            assert!(!state.is_idle_expired(&now, 7200));
        }

        #[test]
        fn touch_refreshes_activity() {
            let mut state = ConversationState::awaiting_crew();
            state.last_activity_at = Timestamp::now().minus_secs(3600);
            state.touch();
            assert!(!state.is_idle_expired(&Timestamp::now(), 1800));
        }
    }

    #[test]
    fn round_trips_through_json() {
        let mut state = ConversationState::awaiting_event_name(CrewId::new());
        state.name_event("Game Night", false).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
