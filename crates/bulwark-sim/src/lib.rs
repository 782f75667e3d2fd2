//! Headless reference driver for the BULWARK coordinator.
//!
//! Owns a hecs world of threats and interceptors plus a set of defending
//! units, runs kinematics and proximity checks at a fixed tick rate, and
//! drives a `CoordinationContext` through the collaborator traits. Same seed,
//! same run.

pub mod components;
pub mod engine;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod units;
pub mod world_setup;

pub use bulwark_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;

#[cfg(test)]
mod tests;
