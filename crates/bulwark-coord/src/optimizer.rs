//! Allocation optimizer: greedy per-tick commitment of units to threats.
//!
//! Threats are visited in id order. Each one is paired with its best unit and
//! the unit's shadow load is bumped before the next threat is scored, so the
//! pass spreads work without solving the full matching problem.

use std::collections::{BTreeSet, HashMap};

use bulwark_core::config::CoordinationConfig;
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::CoordinationStats;
use bulwark_core::types::{InterceptorId, ThreatId, UnitId};
use tracing::debug;

use crate::assignment::AssignmentLedger;
use crate::collaborators::{DefendingUnit, FireRequest, InterceptSolution, Threat, TrajectoryService};
use crate::interceptor::{InFlightInterceptor, InterceptorRegistry};
use crate::scoring;
use crate::unit_ledger::UnitLedger;

/// The unit chosen for a threat and where to aim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub unit: UnitId,
    pub score: f64,
    pub solution: InterceptSolution,
}

/// Whether a threat may receive a new commitment at all.
pub fn threat_is_engageable<T: Threat + ?Sized>(threat: &T, destroyed: &BTreeSet<ThreatId>) -> bool {
    threat.is_active()
        && !destroyed.contains(&threat.id())
        && threat.time_to_impact() > 0.0
        && !threat.is_being_intercepted()
}

/// Highest-scoring unit for `threat`. Ties go to the lower unit id.
pub fn select_scored<T, S>(
    threat: &T,
    ledger: &UnitLedger,
    solver: &S,
    now: f64,
    config: &CoordinationConfig,
) -> Option<Selection>
where
    T: Threat + ?Sized,
    S: TrajectoryService + ?Sized,
{
    let mut best: Option<Selection> = None;
    for status in ledger.iter() {
        let Some(pair) = scoring::evaluate_pair(threat, status, solver, now, config) else {
            continue;
        };
        if pair.score <= 0.0 {
            continue;
        }
        // Ledger iterates in ascending id order, so strict > keeps the lower id on ties.
        if best.map_or(true, |b| pair.score > b.score) {
            best = Some(Selection {
                unit: status.id,
                score: pair.score,
                solution: pair.solution,
            });
        }
    }
    best
}

/// Nearest unit that is operational, loaded, in range and has an intercept
/// solution. No scoring, no timing gate.
pub fn select_nearest<T, S>(threat: &T, ledger: &UnitLedger, solver: &S) -> Option<Selection>
where
    T: Threat + ?Sized,
    S: TrajectoryService + ?Sized,
{
    let threat_pos = threat.position();
    let threat_vel = threat.velocity();
    let mut best: Option<(Selection, f64)> = None;
    for status in ledger.iter().filter(|s| s.can_engage()) {
        let distance = status.position.range_to(&threat_pos);
        if !status.envelope.covers(distance) {
            continue;
        }
        let Some(solution) = solver.intercept(
            &status.position,
            &threat_pos,
            &threat_vel,
            status.envelope.projectile_speed,
        ) else {
            continue;
        };
        // Ascending id order: strict < keeps the lower id on ties.
        if best.map_or(true, |(_, d)| distance < d) {
            let selection = Selection {
                unit: status.id,
                score: 0.0,
                solution,
            };
            best = Some((selection, distance));
        }
    }
    best.map(|(selection, _)| selection)
}

/// Run one allocation pass.
#[allow(clippy::too_many_arguments)]
pub fn run<T, U, S>(
    threats: &[T],
    units: &mut [U],
    ledger: &mut UnitLedger,
    assignments: &mut AssignmentLedger,
    registry: &mut InterceptorRegistry,
    destroyed: &BTreeSet<ThreatId>,
    solver: &S,
    config: &CoordinationConfig,
    now: f64,
    events: &mut Vec<CoordinationEvent>,
    stats: &mut CoordinationStats,
) where
    T: Threat,
    U: DefendingUnit,
    S: TrajectoryService + ?Sized,
{
    let unit_index: HashMap<UnitId, usize> = units
        .iter()
        .enumerate()
        .map(|(idx, u)| (u.id(), idx))
        .collect();

    let mut order: Vec<&T> = threats.iter().collect();
    order.sort_by_key(|t| t.id());

    let mut commits = 0usize;
    for threat in order {
        if commits >= config.max_commits_per_tick || registry.len() >= config.max_in_flight {
            break;
        }
        if !threat_is_engageable(threat, destroyed) {
            continue;
        }

        let threat_id = threat.id();
        let desired = config.desired_count(threat.class());
        let current = assignments.count_for(threat_id);
        if current >= desired {
            continue;
        }

        let selection = if config.coordination_enabled {
            select_scored(threat, ledger, solver, now, config)
        } else {
            select_nearest(threat, ledger, solver)
        };
        let Some(selection) = selection else {
            continue;
        };
        let Some(&idx) = unit_index.get(&selection.unit) else {
            continue;
        };
        let Some(status) = ledger.get_mut(selection.unit) else {
            continue;
        };

        let headroom = (config.max_in_flight - registry.len()) as u32;
        let count = (desired - current).min(status.available_ammo).min(headroom);
        if count == 0 {
            continue;
        }

        status.active_engagements += 1;
        let request = FireRequest {
            threat: threat_id,
            count,
            aim_point: selection.solution.point,
            flight_time_secs: selection.solution.time_secs,
            now,
        };
        let mut created: Vec<InterceptorId> = Vec::new();
        let reported = units[idx].fire(&request, &mut |id| created.push(id));
        if reported as usize != created.len() {
            debug!(
                unit = %selection.unit,
                reported,
                created = created.len(),
                "unit launch count disagrees with callbacks"
            );
        }

        if created.is_empty() {
            // Fire declined: no assignment, threat stays eligible next tick.
            status.active_engagements -= 1;
            continue;
        }

        let launched = created.len() as u32;
        let Some(generation) = assignments.record(threat_id, selection.unit, launched, now) else {
            continue;
        };
        status.available_ammo = status.available_ammo.saturating_sub(launched);
        status.last_fired_at = Some(now);
        let origin = status.position;
        let speed = status.envelope.projectile_speed;
        let pk = status.envelope.base_success_probability;

        for id in created {
            registry.push(InFlightInterceptor {
                id,
                unit: selection.unit,
                target: threat_id,
                assignment: generation,
                launched_at: now,
                origin,
                aim_point: selection.solution.point,
                speed,
                last_known_position: None,
            });
            events.push(CoordinationEvent::InterceptorLaunched {
                interceptor: id,
                unit: selection.unit,
                threat: threat_id,
                aim_point: selection.solution.point,
                flight_time_secs: selection.solution.time_secs,
            });
            stats.interceptors_launched += 1;
            stats.expected_kills += pk;
        }
        commits += 1;

        debug!(
            threat = %threat_id,
            unit = %selection.unit,
            launched,
            score = selection.score,
            "committed interceptors"
        );
    }
}
