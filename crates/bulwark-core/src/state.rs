//! Read-only views of coordinator and driver state.

use serde::{Deserialize, Serialize};

use crate::enums::{AmmoModel, ThreatClass};
use crate::events::CoordinationEvent;
use crate::types::{InterceptorId, Position, SimTime, ThreatId, UnitId};

/// Observability counters for UI and stats collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinationStats {
    pub active_assignments: usize,
    /// Sum of shadow active-engagement counts across units.
    pub total_active_engagements: u32,
    pub unit_count: usize,
    pub in_flight: usize,
    pub interceptors_launched: u32,
    pub interceptions_succeeded: u32,
    pub interceptions_failed: u32,
    pub retargets: u32,
    pub self_destructs: u32,
    pub assignments_expired: u32,
    pub claims_repaired: u32,
    /// Sum of base kill probability over every launch.
    pub expected_kills: f64,
}

/// One assignment ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub threat: ThreatId,
    /// Most recent contributor.
    pub unit: UnitId,
    /// Interceptors per committing unit.
    pub shares: Vec<(UnitId, u32)>,
    pub interceptor_count: u32,
    pub assigned_at: f64,
}

/// A live threat as seen by the reference driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: ThreatId,
    pub class: ThreatClass,
    pub position: Position,
    pub time_to_impact: f64,
    pub being_intercepted: bool,
}

/// A live interceptor as seen by the reference driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterceptorView {
    pub id: InterceptorId,
    pub target: ThreatId,
    pub position: Position,
}

/// A defending unit as seen by the reference driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub ammo_model: AmmoModel,
    pub position: Position,
    pub available_shots: u32,
    pub operational: bool,
}

/// Running score tracked by the reference driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreView {
    pub threats_spawned: u32,
    pub threats_killed: u32,
    pub threats_impacted: u32,
    pub threats_fragmented: u32,
    pub interceptors_fired: u32,
}

/// Complete driver state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub threats: Vec<ThreatView>,
    pub interceptors: Vec<InterceptorView>,
    pub units: Vec<UnitView>,
    pub assignments: Vec<AssignmentView>,
    pub stats: CoordinationStats,
    pub score: ScoreView,
    pub events: Vec<CoordinationEvent>,
}
