//! Repurposing of interceptors whose target was removed.
//!
//! An orphan is retargeted onto the best reachable active threat, or safed
//! with a controlled self-destruct. It never keeps flying at a dead target.

use std::collections::{BTreeMap, BTreeSet};

use bulwark_core::config::CoordinationConfig;
use bulwark_core::constants::RETARGET_MIN_TTI_SECS;
use bulwark_core::enums::SafeReason;
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::CoordinationStats;
use bulwark_core::types::{Position, ThreatId};
use tracing::debug;

use crate::assignment::AssignmentLedger;
use crate::collaborators::Threat;
use crate::interceptor::InterceptorRegistry;

/// Distances below this are clamped to avoid an infinite score.
const MIN_RETARGET_DISTANCE: f64 = 1e-6;

/// Retarget score: nearer, more urgent and less covered threats score higher.
pub fn retarget_score(distance: f64, time_to_impact: f64, existing: usize) -> f64 {
    (1.0 / distance.max(MIN_RETARGET_DISTANCE))
        * (1.0 / time_to_impact.max(RETARGET_MIN_TTI_SECS))
        * (1.0 / (existing as f64 + 1.0))
}

/// Best substitute for an interceptor at `from`, skipping everything in `dead`.
pub fn best_substitute<T: Threat>(
    from: &Position,
    threats: &BTreeMap<ThreatId, &T>,
    dead: &BTreeSet<ThreatId>,
    registry: &InterceptorRegistry,
    config: &CoordinationConfig,
) -> Option<ThreatId> {
    let mut best: Option<(ThreatId, f64)> = None;
    for (id, threat) in threats {
        if dead.contains(id) || !threat.is_active() || threat.time_to_impact() <= 0.0 {
            continue;
        }
        let distance = from.range_to(&threat.position());
        if distance > config.retarget_reach {
            continue;
        }
        let existing = registry.referencing(*id);
        if existing >= config.retarget_cap {
            continue;
        }
        let score = retarget_score(distance, threat.time_to_impact(), existing);
        // Map iterates ids ascending: strict > keeps the lower id on ties.
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((*id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Repurpose every interceptor still pointed at a threat in `removed`.
///
/// `dead` must contain `removed` plus any threat known to be destroyed, so
/// that no orphan is steered onto another corpse.
#[allow(clippy::too_many_arguments)]
pub fn run<T: Threat>(
    removed: &BTreeSet<ThreatId>,
    dead: &BTreeSet<ThreatId>,
    threats: &BTreeMap<ThreatId, &T>,
    assignments: &mut AssignmentLedger,
    registry: &mut InterceptorRegistry,
    config: &CoordinationConfig,
    now: f64,
    events: &mut Vec<CoordinationEvent>,
    stats: &mut CoordinationStats,
) {
    for &gone in removed {
        assignments.clear(gone);

        for orphan in registry.targeting(gone) {
            let Some(interceptor) = registry.get(orphan) else {
                continue;
            };
            let position = interceptor.position_at(now);
            let unit = interceptor.unit;

            match best_substitute(&position, threats, dead, registry, config) {
                Some(substitute) => {
                    let generation = assignments.record(substitute, unit, 1, now);
                    if let Some(interceptor) = registry.get_mut(orphan) {
                        interceptor.target = substitute;
                        if let Some(generation) = generation {
                            interceptor.assignment = generation;
                        }
                    }
                    stats.retargets += 1;
                    events.push(CoordinationEvent::Retarget {
                        interceptor: orphan,
                        from: gone,
                        to: substitute,
                    });
                    debug!(interceptor = %orphan, from = %gone, to = %substitute, "retargeted orphan");
                }
                None => {
                    registry.remove(orphan);
                    stats.self_destructs += 1;
                    events.push(CoordinationEvent::SelfDestruct {
                        interceptor: orphan,
                        reason: SafeReason::NoSubstitute,
                    });
                    debug!(interceptor = %orphan, from = %gone, "no substitute, self-destruct");
                }
            }
        }
    }
}
