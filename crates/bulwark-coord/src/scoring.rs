//! Multi-factor scoring of (threat, unit) pairs.
//!
//! Range, load and resource factors, urgency bonus, recency penalty and
//! self-defense bonus multiply together. The timing check is a gate: a unit
//! that cannot arrive before impact scores 0 no matter how good the rest is.

use bulwark_core::config::CoordinationConfig;
use bulwark_core::constants::{LOAD_FACTOR_FLOOR, RECENCY_PENALTY, SELF_DEFENSE_TIERS};
use bulwark_core::types::Position;

use crate::collaborators::{InterceptSolution, Threat, TrajectoryService};
use crate::unit_ledger::UnitStatus;

/// A scored, feasible pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub score: f64,
    pub distance: f64,
    /// `distance / projectile_speed`.
    pub intercept_time: f64,
    pub solution: InterceptSolution,
}

pub fn range_factor(distance: f64, max_range: f64) -> f64 {
    1.0 - distance / max_range
}

pub fn load_factor(status: &UnitStatus) -> f64 {
    let channels = status.max_concurrent_engagements() as f64;
    (1.0 - status.active_engagements as f64 / channels).max(LOAD_FACTOR_FLOOR)
}

pub fn resource_factor(status: &UnitStatus) -> f64 {
    let fill = status.available_ammo as f64 / status.envelope.magazine_size as f64;
    0.5 + 0.5 * fill.min(1.0)
}

pub fn urgency_bonus(intercept_time: f64, time_to_impact: f64) -> f64 {
    2.0 - intercept_time / time_to_impact
}

pub fn recency_penalty(last_fired_at: Option<f64>, now: f64, window_secs: f64) -> f64 {
    match last_fired_at {
        Some(t) if now - t < window_secs => RECENCY_PENALTY,
        _ => 1.0,
    }
}

/// Multiplier for threats projected to land close to the unit itself.
pub fn self_defense_bonus(impact_point: Option<Position>, unit_pos: &Position) -> f64 {
    let Some(impact) = impact_point else {
        return 1.0;
    };
    let d = impact.range_to(unit_pos);
    SELF_DEFENSE_TIERS
        .iter()
        .find(|(radius, _)| d <= *radius)
        .map_or(1.0, |(_, mult)| *mult)
}

/// Score a pair, or `None` when the pair is infeasible (score 0).
pub fn evaluate_pair<T, S>(
    threat: &T,
    unit: &UnitStatus,
    solver: &S,
    now: f64,
    config: &CoordinationConfig,
) -> Option<PairScore>
where
    T: Threat + ?Sized,
    S: TrajectoryService + ?Sized,
{
    if !unit.can_engage() {
        return None;
    }

    let env = &unit.envelope;
    let threat_pos = threat.position();
    let distance = unit.position.range_to(&threat_pos);
    if !env.covers(distance) {
        return None;
    }

    let solution = solver.intercept(
        &unit.position,
        &threat_pos,
        &threat.velocity(),
        env.projectile_speed,
    )?;

    let tti = threat.time_to_impact();
    let intercept_time = distance / env.projectile_speed;
    if tti <= 0.0 || intercept_time >= tti {
        return None;
    }

    let score = range_factor(distance, env.max_range)
        * load_factor(unit)
        * resource_factor(unit)
        * urgency_bonus(intercept_time, tti)
        * recency_penalty(unit.last_fired_at, now, config.recency_window_secs)
        * self_defense_bonus(threat.impact_point(), &unit.position);

    Some(PairScore {
        score,
        distance,
        intercept_time,
        solution,
    })
}

/// Scalar score; 0 for infeasible pairs.
pub fn pair_score<T, S>(
    threat: &T,
    unit: &UnitStatus,
    solver: &S,
    now: f64,
    config: &CoordinationConfig,
) -> f64
where
    T: Threat + ?Sized,
    S: TrajectoryService + ?Sized,
{
    evaluate_pair(threat, unit, solver, now, config).map_or(0.0, |p| p.score)
}
