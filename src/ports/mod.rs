//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - per-(user, correspondent) state persistence
//! - `CrewDirectory` - read-only crew resolution for a user
//! - `CalendarProbe` - calendar connection status and availability search

mod calendar_probe;
mod conversation_store;
mod crew_directory;

pub use calendar_probe::{CalendarProbe, CalendarProbeError};
pub use conversation_store::{ConversationStore, ConversationStoreError};
pub use crew_directory::{CrewDirectory, CrewDirectoryError};
