//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `auto_sync` - The Auto Sync conversation state machine

pub mod auto_sync;
pub mod foundation;
