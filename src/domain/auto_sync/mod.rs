//! The Auto Sync conversation state machine.
//!
//! Auto Sync negotiates a group event through a short message exchange:
//! resolve a crew, name the event, then settle on candidate times either
//! from a connected calendar or from explicitly supplied options.

mod command;
mod crew;
mod engine;
mod phase;
pub mod reply;
mod slots;
mod state;
mod time_window;

pub use command::InboundCommand;
pub use crew::Crew;
pub use engine::{AutoSyncEngine, EngineOutcome, StateTransition};
pub use phase::Phase;
pub use slots::{parse_time_options, week_view, CandidateSlot, TimeOptionsError};
pub use state::{ConversationState, StateError};
pub use time_window::{parse_time_window, DayPart, TimeWindow};
