//! Adapters - Implementations of ports for concrete backends.
//!
//! All current adapters are in-memory, suitable for development, tests,
//! and single-process deployments. Persistent backends implement the
//! same ports.

pub mod calendar;
pub mod crew;
pub mod storage;
