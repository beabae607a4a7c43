//! The Auto Sync state machine.
//!
//! One inbound message plus the current conversation state in, a reply
//! plus a state transition out. All branching lives here; persistence,
//! per-key locking, and transport stay outside.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use super::command::InboundCommand;
use super::slots::{parse_time_options, week_view};
use super::state::ConversationState;
use super::{reply, Phase};
use crate::domain::foundation::ConversationKey;
use crate::ports::{CalendarProbe, CrewDirectory};

/// What the dispatcher should do with the stored state after a message.
#[derive(Debug, Clone, PartialEq)]
pub enum StateTransition {
    /// Leave stored state untouched (e.g., transient collaborator
    /// failure: the same input can be safely resent).
    None,
    /// Persist this state for the key.
    Save(ConversationState),
    /// Remove the record; the conversation is over.
    Clear,
}

/// Result of handling one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    /// Text to deliver back, or `None` when the message is not part of
    /// an Auto Sync conversation and normal chat should proceed.
    pub reply: Option<String>,
    /// Required state change.
    pub transition: StateTransition,
}

impl EngineOutcome {
    fn reply(text: String, transition: StateTransition) -> Self {
        Self {
            reply: Some(text),
            transition,
        }
    }

    fn not_handled() -> Self {
        Self {
            reply: None,
            transition: StateTransition::None,
        }
    }
}

/// The conversational state machine for Auto Sync.
pub struct AutoSyncEngine<D, P>
where
    D: CrewDirectory,
    P: CalendarProbe,
{
    crew_directory: Arc<D>,
    calendar_probe: Arc<P>,
    call_timeout: Duration,
}

impl<D, P> AutoSyncEngine<D, P>
where
    D: CrewDirectory,
    P: CalendarProbe,
{
    /// Creates an engine over the two collaborators. `call_timeout`
    /// bounds every collaborator call; elapsing it is treated the same
    /// as the collaborator being unreachable.
    pub fn new(crew_directory: Arc<D>, calendar_probe: Arc<P>, call_timeout: Duration) -> Self {
        Self {
            crew_directory,
            calendar_probe,
            call_timeout,
        }
    }

    /// Handles one inbound message against the current state.
    ///
    /// Never fails: collaborator errors and timeouts become a transient
    /// reply with the state left unchanged, so the user's next message
    /// re-drives the same phase.
    pub async fn handle(
        &self,
        key: &ConversationKey,
        message_text: &str,
        state: Option<ConversationState>,
    ) -> EngineOutcome {
        let command = InboundCommand::classify(message_text, state.is_some());
        debug!(key = %key, phase = ?state.as_ref().map(|s| s.phase), ?command, "handling message");

        match (state, command) {
            // Escape hatch: explicit exit from any active phase.
            (Some(_), InboundCommand::Exit) => {
                EngineOutcome::reply(reply::cancelled(), StateTransition::Clear)
            }

            // A fresh trigger always restarts, active conversation or not.
            (_, InboundCommand::Trigger { crew_name }) => {
                self.start(key, crew_name.as_deref()).await
            }

            (Some(state), InboundCommand::Text(text)) => match state.phase {
                Phase::AwaitingCrew => self.resolve_crew(key, state, &text).await,
                Phase::AwaitingEventName => self.collect_event_name(key, state, &text).await,
                Phase::AwaitingTimeWindow => self.collect_time_window(key, state, &text).await,
                Phase::ProposalReady => Self::confirm_proposal(state, &text),
            },

            // No conversation and not a trigger: not ours.
            (None, _) => EngineOutcome::not_handled(),
        }
    }

    /// Entry: the trigger keyword, optionally with a crew name token.
    async fn start(&self, key: &ConversationKey, crew_name: Option<&str>) -> EngineOutcome {
        if let Some(name) = crew_name {
            let found = match self.bounded_find_crew(key, name).await {
                Ok(found) => found,
                Err(()) => return EngineOutcome::reply(reply::transient_failure(), StateTransition::None),
            };
            return match found {
                Some(crew) => EngineOutcome::reply(
                    reply::event_name_prompt(),
                    StateTransition::Save(ConversationState::awaiting_event_name(crew.id)),
                ),
                // Unknown crew from idle stays idle; retry is another
                // "auto sync <name>".
                None => EngineOutcome::reply(reply::crew_not_found(), StateTransition::None),
            };
        }

        let crews = match self.bounded_list_crews(key).await {
            Ok(crews) => crews,
            Err(()) => return EngineOutcome::reply(reply::transient_failure(), StateTransition::None),
        };
        if crews.is_empty() {
            return EngineOutcome::reply(reply::no_crews(), StateTransition::None);
        }
        EngineOutcome::reply(
            reply::crew_menu(&crews),
            StateTransition::Save(ConversationState::awaiting_crew()),
        )
    }

    /// AwaitingCrew: resolve the text as a crew name or menu number.
    async fn resolve_crew(
        &self,
        key: &ConversationKey,
        mut state: ConversationState,
        text: &str,
    ) -> EngineOutcome {
        let trimmed = text.trim();

        // Menu selection by number.
        if let Ok(index) = trimmed.parse::<usize>() {
            let crews = match self.bounded_list_crews(key).await {
                Ok(crews) => crews,
                Err(()) => {
                    return EngineOutcome::reply(reply::transient_failure(), StateTransition::None)
                }
            };
            if index >= 1 && index <= crews.len() {
                let crew = &crews[index - 1];
                state.resolve_crew(crew.id).ok();
                return EngineOutcome::reply(
                    reply::event_name_prompt(),
                    StateTransition::Save(state),
                );
            }
            state.touch();
            return EngineOutcome::reply(reply::crew_not_found(), StateTransition::Save(state));
        }

        let found = match self.bounded_find_crew(key, trimmed).await {
            Ok(found) => found,
            Err(()) => return EngineOutcome::reply(reply::transient_failure(), StateTransition::None),
        };
        match found {
            Some(crew) => {
                state.resolve_crew(crew.id).ok();
                EngineOutcome::reply(reply::event_name_prompt(), StateTransition::Save(state))
            }
            None => {
                state.touch();
                EngineOutcome::reply(reply::crew_not_found(), StateTransition::Save(state))
            }
        }
    }

    /// AwaitingEventName: accept any non-blank text as the event name,
    /// then decide calendar mode once.
    async fn collect_event_name(
        &self,
        key: &ConversationKey,
        mut state: ConversationState,
        text: &str,
    ) -> EngineOutcome {
        let name = text.trim();
        if name.is_empty() {
            state.touch();
            return EngineOutcome::reply(reply::event_name_required(), StateTransition::Save(state));
        }

        let connected = match self.bounded_is_connected(key).await {
            Ok(connected) => connected,
            Err(()) => return EngineOutcome::reply(reply::transient_failure(), StateTransition::None),
        };

        state.name_event(name, connected).ok();
        let prompt = if connected {
            reply::calendar_window_prompt()
        } else {
            reply::no_calendar_times_prompt()
        };
        EngineOutcome::reply(prompt, StateTransition::Save(state))
    }

    /// AwaitingTimeWindow: calendar mode searches availability;
    /// no-calendar mode parses explicit options.
    async fn collect_time_window(
        &self,
        key: &ConversationKey,
        mut state: ConversationState,
        text: &str,
    ) -> EngineOutcome {
        if state.calendar_mode == Some(true) {
            let slots = match self.bounded_search(key, text).await {
                Ok(slots) => slots,
                Err(()) => {
                    return EngineOutcome::reply(reply::transient_failure(), StateTransition::None)
                }
            };
            if slots.is_empty() {
                state.touch();
                return EngineOutcome::reply(reply::no_availability(), StateTransition::Save(state));
            }
            let first = slots[0].clone();
            let view = week_view(&first, &slots[1..]);
            state.propose(text, first.clone(), slots[1..].to_vec()).ok();
            return EngineOutcome::reply(
                reply::calendar_proposal(&first, &view),
                StateTransition::Save(state),
            );
        }

        // No-calendar mode: no search is ever issued here.
        match parse_time_options(text, Utc::now().date_naive()) {
            Ok(options) => {
                state
                    .propose(text, options[0].clone(), options[1..].to_vec())
                    .ok();
                EngineOutcome::reply(reply::options_echo(&options), StateTransition::Save(state))
            }
            Err(_) => {
                state.touch();
                EngineOutcome::reply(reply::invalid_time_options(), StateTransition::Save(state))
            }
        }
    }

    /// ProposalReady: "yes" completes the conversation, "next" cycles to
    /// the following candidate in calendar mode, anything else is nudged
    /// back to the confirmation choices.
    fn confirm_proposal(mut state: ConversationState, text: &str) -> EngineOutcome {
        let trimmed = text.trim();

        if trimmed.eq_ignore_ascii_case("yes") {
            let saved = state
                .proposed_option
                .as_ref()
                .map(reply::proposal_saved)
                .unwrap_or_else(reply::proposal_nudge);
            return EngineOutcome::reply(saved, StateTransition::Clear);
        }

        if trimmed.eq_ignore_ascii_case("next")
            && state.calendar_mode == Some(true)
            && state.next_option().is_ok()
        {
            if let Some(option) = state.proposed_option.clone() {
                let view = week_view(&option, &state.alternate_options);
                return EngineOutcome::reply(
                    reply::calendar_proposal(&option, &view),
                    StateTransition::Save(state),
                );
            }
        }

        state.touch();
        EngineOutcome::reply(reply::proposal_nudge(), StateTransition::Save(state))
    }

    async fn bounded_find_crew(
        &self,
        key: &ConversationKey,
        name: &str,
    ) -> Result<Option<super::Crew>, ()> {
        match tokio::time::timeout(
            self.call_timeout,
            self.crew_directory.find_by_name(&key.user_id, name),
        )
        .await
        {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(err)) => {
                warn!(key = %key, error = %err, "crew directory call failed");
                Err(())
            }
            Err(_) => {
                warn!(key = %key, "crew directory call timed out");
                Err(())
            }
        }
    }

    async fn bounded_list_crews(&self, key: &ConversationKey) -> Result<Vec<super::Crew>, ()> {
        match tokio::time::timeout(
            self.call_timeout,
            self.crew_directory.list_for_user(&key.user_id),
        )
        .await
        {
            Ok(Ok(crews)) => Ok(crews),
            Ok(Err(err)) => {
                warn!(key = %key, error = %err, "crew directory call failed");
                Err(())
            }
            Err(_) => {
                warn!(key = %key, "crew directory call timed out");
                Err(())
            }
        }
    }

    async fn bounded_is_connected(&self, key: &ConversationKey) -> Result<bool, ()> {
        match tokio::time::timeout(
            self.call_timeout,
            self.calendar_probe.is_connected(&key.user_id),
        )
        .await
        {
            Ok(Ok(connected)) => Ok(connected),
            Ok(Err(err)) => {
                warn!(key = %key, error = %err, "calendar probe call failed");
                Err(())
            }
            Err(_) => {
                warn!(key = %key, "calendar probe call timed out");
                Err(())
            }
        }
    }

    async fn bounded_search(
        &self,
        key: &ConversationKey,
        window: &str,
    ) -> Result<Vec<super::CandidateSlot>, ()> {
        match tokio::time::timeout(
            self.call_timeout,
            self.calendar_probe.search(&key.user_id, window),
        )
        .await
        {
            Ok(Ok(slots)) => Ok(slots),
            Ok(Err(err)) => {
                warn!(key = %key, error = %err, "calendar search failed");
                Err(())
            }
            Err(_) => {
                warn!(key = %key, "calendar search timed out");
                Err(())
            }
        }
    }
}
