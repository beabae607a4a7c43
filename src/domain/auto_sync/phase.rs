//! Phases of an active Auto Sync conversation.
//!
//! A phase only exists while a conversation record is stored; the idle
//! state is the absence of a record, and cancellation is realized by
//! clearing the record. Phases are a closed enumeration so the dispatcher
//! never has to infer position in the flow from message text.

use serde::{Deserialize, Serialize};

/// Where an active Auto Sync conversation currently stands.
///
/// The flow is linear with one branch (calendar vs. no-calendar mode at
/// `AwaitingTimeWindow`) and one escape (exit/cancel from anywhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A bare trigger was received; the next message names the crew.
    AwaitingCrew,

    /// A crew is resolved; the next non-blank message names the event.
    AwaitingEventName,

    /// Event named; the next message describes a time window (calendar
    /// mode) or lists explicit candidate times (no-calendar mode).
    AwaitingTimeWindow,

    /// A first candidate has been surfaced and awaits confirmation.
    ProposalReady,
}

impl Phase {
    /// Returns a short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingCrew => "awaiting_crew",
            Self::AwaitingEventName => "awaiting_event_name",
            Self::AwaitingTimeWindow => "awaiting_time_window",
            Self::ProposalReady => "proposal_ready",
        }
    }

    /// Returns all phases reachable from this one by a normal message.
    ///
    /// Exit/cancel additionally escapes every phase by clearing the
    /// record, which is not represented here.
    pub fn valid_next_phases(&self) -> Vec<Self> {
        match self {
            Self::AwaitingCrew => vec![Self::AwaitingCrew, Self::AwaitingEventName],
            Self::AwaitingEventName => vec![Self::AwaitingEventName, Self::AwaitingTimeWindow],
            Self::AwaitingTimeWindow => vec![Self::AwaitingTimeWindow, Self::ProposalReady],
            Self::ProposalReady => vec![Self::ProposalReady],
        }
    }

    /// Returns true if transition to target phase is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_next_phases().contains(target)
    }

    /// Returns true once a crew must already be resolved.
    pub fn requires_crew(&self) -> bool {
        !matches!(self, Self::AwaitingCrew)
    }

    /// Returns true once an event name must already be recorded.
    pub fn requires_event_name(&self) -> bool {
        matches!(self, Self::AwaitingTimeWindow | Self::ProposalReady)
    }
}
