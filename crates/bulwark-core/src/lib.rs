//! Core types and definitions for the BULWARK engagement coordinator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identities, geometry, events, stats snapshots, policy config, errors
//! and constants. It has no dependency on any simulation runtime.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
