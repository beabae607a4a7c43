//! Auto Sync - Conversational event-time negotiation.
//!
//! This crate implements the Auto Sync state machine: a per-(user,
//! correspondent) conversation that resolves a crew, collects an event
//! name, and negotiates candidate times, optionally against a connected
//! calendar.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
