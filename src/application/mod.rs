//! Application layer - message-handling use case and boundary shapes.

pub mod dto;
pub mod handle_message;

pub use dto::{CallerRole, DecodeError, InboundMessage, OutboundResponse};
pub use handle_message::{HandleMessageError, HandleMessageService};
