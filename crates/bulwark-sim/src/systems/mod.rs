//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` plus whatever engine state
//! they need. They own no state of their own.

pub mod cleanup;
pub mod guidance;
pub mod impact;
pub mod intercept;
pub mod movement;
pub mod snapshot;
pub mod wave_spawner;
