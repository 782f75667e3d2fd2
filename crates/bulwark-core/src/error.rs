//! Error types for the fail-fast paths: unit registration and config loading.

use crate::types::UnitId;

/// A unit rejected at registration because its envelope would corrupt scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("unit {unit} has non-positive magazine size")]
    NonPositiveMagazine { unit: UnitId },

    #[error("unit {unit} has invalid range envelope [{min_range}, {max_range}]")]
    InvalidRange {
        unit: UnitId,
        min_range: f64,
        max_range: f64,
    },

    #[error("unit {unit} has non-positive projectile speed {speed}")]
    NonPositiveProjectileSpeed { unit: UnitId, speed: f64 },

    #[error("unit {unit} has success probability {probability} outside [0, 1]")]
    InvalidSuccessProbability { unit: UnitId, probability: f64 },

    #[error("unit {unit} is already registered")]
    DuplicateUnit { unit: UnitId },
}

/// A policy configuration that failed to load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
