//! Transport-boundary shapes.
//!
//! The dispatcher hands the service an `InboundMessage` and gets back an
//! `OutboundResponse`. Decoding is strict: unknown fields and missing
//! fields are rejected with a typed error instead of defaulting, so a
//! malformed body can never silently read as an empty message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who sent the inbound message relative to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    /// The user who owns the crews and drives the flow.
    Host,
    /// A crew member replying; not part of the negotiation flow.
    Invitee,
}

/// Errors decoding a boundary payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed inbound message: {0}")]
    MalformedMessage(#[source] serde_json::Error),

    #[error("Malformed response payload: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// One inbound text message as the transport delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InboundMessage {
    /// Handle of the correspondent on the other side of the thread.
    pub correspondent_id: String,
    /// Raw message text, untrimmed.
    pub message_text: String,
    /// Role of the sender.
    pub caller_role: CallerRole,
    /// Whether the dispatcher should deliver the reply externally
    /// (false in dry-run and test harness invocations).
    pub deliver_externally: bool,
}

impl InboundMessage {
    /// Strictly decodes an inbound payload.
    pub fn decode(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body).map_err(DecodeError::MalformedMessage)
    }
}

/// The reply produced for one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutboundResponse {
    /// Text to deliver back to the correspondent.
    pub response_text: String,
}

impl OutboundResponse {
    pub fn new(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
        }
    }

    /// Strictly decodes a response payload.
    pub fn decode(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body).map_err(DecodeError::MalformedResponse)
    }
}
