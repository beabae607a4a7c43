//! Outbound reply text.
//!
//! All user-visible strings live here so the engine stays branching
//! logic only. Wordings the manual test suite keys on are kept verbatim.

use super::slots::CandidateSlot;
use super::Crew;

/// The user has no crews; nothing to sync.
pub fn no_crews() -> String {
    "You don't have any crews yet. Text create crew to get started.".to_string()
}

/// Numbered crew menu, shown when the trigger carries no crew name.
pub fn crew_menu(crews: &[Crew]) -> String {
    let list = crews
        .iter()
        .enumerate()
        .map(|(idx, crew)| format!("{}. {}", idx + 1, crew.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Which crew?\n{list}")
}

/// The supplied crew name matched nothing.
pub fn crew_not_found() -> String {
    "I couldn't find that crew. Try again, text create crew to make a new one, or exit."
        .to_string()
}

/// Prompt for the event name after crew resolution.
pub fn event_name_prompt() -> String {
    "Event name?".to_string()
}

/// Re-prompt for a blank event name.
pub fn event_name_required() -> String {
    "Please add an event name.".to_string()
}

/// Time-window prompt when a calendar is connected. Never mentions
/// connecting a calendar; the connection is already detected.
pub fn calendar_window_prompt() -> String {
    "What time window works for you? (e.g., 'next week evenings' or 'weekend mornings')"
        .to_string()
}

/// Time-options prompt when no calendar is connected. Must not suggest
/// connecting one.
pub fn no_calendar_times_prompt() -> String {
    "What times work? Send 1-3 options (e.g., 'Thu 12/19, 6-8pm, Sat 12/21, 10am-12pm')"
        .to_string()
}

/// Re-prompt when explicit time options could not be parsed.
pub fn invalid_time_options() -> String {
    "I need 1-3 time options. Try again (e.g., 'Thu 12/19, 6-8pm, Sat 12/21, 10am-12pm')"
        .to_string()
}

/// The calendar search found nothing in the requested window.
pub fn no_availability() -> String {
    "I couldn't find any available times in that window. Try a different time range.".to_string()
}

/// Calendar-mode proposal with the week view.
pub fn calendar_proposal(option: &CandidateSlot, week_view: &str) -> String {
    format!(
        "Here's a window that works. {}.\n\n{}\nReply yes to save, suggest a change, or next to see another option.",
        option.description(),
        week_view
    )
}

/// No-calendar mode: echo the parsed options back for confirmation.
pub fn options_echo(options: &[CandidateSlot]) -> String {
    let list = options
        .iter()
        .enumerate()
        .map(|(idx, slot)| format!("{}. {}", idx + 1, slot.short_description()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Got it. Here are your options:\n{list}\nReply yes to confirm, or exit.")
}

/// Proposal accepted; the conversation is complete.
pub fn proposal_saved(option: &CandidateSlot) -> String {
    format!("Saved. {}.", option.description())
}

/// Nudge when a proposal is pending and the reply was not understood.
pub fn proposal_nudge() -> String {
    "Reply yes to save, or exit.".to_string()
}

/// Explicit exit/cancel. Must never mention a proposed time.
pub fn cancelled() -> String {
    "Auto Sync cancelled.".to_string()
}

/// A collaborator call failed or timed out; the same input can be resent.
pub fn transient_failure() -> String {
    "I'm having trouble reaching that right now. Try again in a moment.".to_string()
}
