//! Events emitted by the coordinator each tick.
//!
//! Outcome events feed the external stats/economy collaborator; command
//! events (`Retarget`, `SelfDestruct`) must be applied by the physics driver.

use serde::{Deserialize, Serialize};

use crate::enums::SafeReason;
use crate::types::{InterceptorId, Position, ThreatId, UnitId};

/// Everything the coordinator decided or observed during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoordinationEvent {
    /// An interceptor was launched against a threat.
    InterceptorLaunched {
        interceptor: InterceptorId,
        unit: UnitId,
        threat: ThreatId,
        aim_point: Position,
        flight_time_secs: f64,
    },
    /// A claimed resolution destroyed the threat.
    InterceptionSucceeded {
        threat: ThreatId,
        interceptor: InterceptorId,
        unit: UnitId,
    },
    /// A claimed resolution missed; the threat remains engageable.
    InterceptionFailed {
        threat: ThreatId,
        interceptor: InterceptorId,
        unit: UnitId,
    },
    /// Steer an orphaned interceptor onto a substitute target.
    Retarget {
        interceptor: InterceptorId,
        from: ThreatId,
        to: ThreatId,
    },
    /// Detonate an interceptor in a controlled manner.
    SelfDestruct {
        interceptor: InterceptorId,
        reason: SafeReason,
    },
    /// Stale-state sweep purged an abandoned assignment.
    AssignmentExpired { threat: ThreatId, age_secs: f64 },
    /// Stale-state sweep released a claim nothing was resolving.
    ClaimRepaired { threat: ThreatId },
}

/// Result of a single coordinator tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Simulation time the tick ran at (seconds).
    pub now: f64,
    pub events: Vec<CoordinationEvent>,
}

impl TickReport {
    /// Threats destroyed this tick.
    pub fn successes(&self) -> impl Iterator<Item = ThreatId> + '_ {
        self.events.iter().filter_map(|e| match e {
            CoordinationEvent::InterceptionSucceeded { threat, .. } => Some(*threat),
            _ => None,
        })
    }

    /// Threats that survived a claimed resolution this tick.
    pub fn failures(&self) -> impl Iterator<Item = ThreatId> + '_ {
        self.events.iter().filter_map(|e| match e {
            CoordinationEvent::InterceptionFailed { threat, .. } => Some(*threat),
            _ => None,
        })
    }

    /// Number of interceptors launched this tick.
    pub fn launches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CoordinationEvent::InterceptorLaunched { .. }))
            .count()
    }
}
