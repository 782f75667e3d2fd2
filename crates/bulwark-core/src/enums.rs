//! Enumeration types used throughout the coordinator.

use serde::{Deserialize, Serialize};

/// Threat classification. Drives how many interceptors are wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatClass {
    #[default]
    Ordinary,
    /// Flagged high-value: engaged with a salvo of two.
    HighValue,
}

/// Intercept result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterceptResult {
    Hit,
    Miss,
}

/// How the optimizer picks a unit for a threat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationMode {
    /// Multi-factor scoring across every capable unit.
    #[default]
    Scored,
    /// Nearest capable unit, no scoring. Used when coordination is disabled.
    NearestCapable,
}

/// Why an interceptor was ordered to self-destruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeReason {
    /// Target removed and no reachable substitute existed.
    NoSubstitute,
    /// Interceptor outlived its time-to-live.
    Expired,
}

/// Ammunition model of a defending unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoModel {
    /// Discrete rounds in a magazine.
    #[default]
    Magazine,
    /// Shots drawn from a recharging energy store.
    Energy,
}

/// Threat archetype spawned by the reference driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatArchetype {
    /// Fast unguided rocket.
    Rocket,
    /// Guided cruise missile.
    CruiseMissile,
    /// Slow, heavy warhead flagged high-value.
    HeavyWarhead,
}

/// Named scenario for the reference driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    /// A handful of rockets on one axis.
    #[default]
    Skirmish,
    /// Dense multi-axis raid that exceeds the in-flight cap.
    Saturation,
    /// Mixed raid led by high-value warheads.
    HighValueRaid,
}
