//! Engagement resolution for reported detonations.
//!
//! Each detonation is resolved against its interceptor's current target under
//! the threat's claim. A hit keeps the claim (the threat is dead); a miss
//! releases it so later arrivals in the same tick can still resolve.

use std::collections::{BTreeMap, BTreeSet};

use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::CoordinationStats;
use bulwark_core::types::ThreatId;
use tracing::debug;

use crate::assignment::AssignmentLedger;
use crate::collaborators::{Detonation, Threat};
use crate::interceptor::InterceptorRegistry;

/// What happened to one reported detonation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Interceptor unknown to the core (already safed or resolved).
    UnknownInterceptor,
    /// Target already gone; nothing recorded.
    TargetInactive,
    /// Another resolution holds the claim; nothing recorded.
    ClaimContended,
    Hit,
    Miss,
}

/// Resolve detonations in arrival order. Returns threats destroyed by hits.
pub fn run<T: Threat>(
    detonations: Vec<Detonation>,
    threats: &BTreeMap<ThreatId, &T>,
    assignments: &mut AssignmentLedger,
    registry: &mut InterceptorRegistry,
    destroyed: &mut BTreeSet<ThreatId>,
    events: &mut Vec<CoordinationEvent>,
    stats: &mut CoordinationStats,
) -> Vec<ThreatId> {
    let mut killed = Vec::new();
    for detonation in detonations {
        let outcome = resolve_one(
            &detonation,
            threats,
            assignments,
            registry,
            destroyed,
            events,
            stats,
        );
        if let (Resolution::Hit, Some(threat)) = (outcome.0, outcome.1) {
            killed.push(threat);
        }
    }
    killed
}

/// Resolve a single detonation.
pub fn resolve_one<T: Threat>(
    detonation: &Detonation,
    threats: &BTreeMap<ThreatId, &T>,
    assignments: &mut AssignmentLedger,
    registry: &mut InterceptorRegistry,
    destroyed: &mut BTreeSet<ThreatId>,
    events: &mut Vec<CoordinationEvent>,
    stats: &mut CoordinationStats,
) -> (Resolution, Option<ThreatId>) {
    // The interceptor detonated either way, so it leaves the in-flight list.
    let Some(interceptor) = registry.remove(detonation.interceptor) else {
        return (Resolution::UnknownInterceptor, None);
    };
    let target = interceptor.target;

    let threat = match threats.get(&target) {
        Some(t) if t.is_active() && !destroyed.contains(&target) => *t,
        _ => return (Resolution::TargetInactive, Some(target)),
    };

    if !threat.mark_as_being_intercepted() {
        assignments.release(target, interceptor.unit, interceptor.assignment);
        return (Resolution::ClaimContended, Some(target));
    }

    if detonation.hit {
        destroyed.insert(target);
        assignments.clear(target);
        stats.interceptions_succeeded += 1;
        events.push(CoordinationEvent::InterceptionSucceeded {
            threat: target,
            interceptor: interceptor.id,
            unit: interceptor.unit,
        });
        debug!(
            threat = %target,
            interceptor = %interceptor.id,
            quality = detonation.quality,
            pk = detonation.kill_probability,
            "interception succeeded"
        );
        (Resolution::Hit, Some(target))
    } else {
        threat.unmark_as_being_intercepted();
        assignments.release(target, interceptor.unit, interceptor.assignment);
        stats.interceptions_failed += 1;
        events.push(CoordinationEvent::InterceptionFailed {
            threat: target,
            interceptor: interceptor.id,
            unit: interceptor.unit,
        });
        debug!(
            threat = %target,
            interceptor = %interceptor.id,
            quality = detonation.quality,
            "interception failed"
        );
        (Resolution::Miss, Some(target))
    }
}
