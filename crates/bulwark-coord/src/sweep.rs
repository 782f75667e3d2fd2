//! Stale-state sweep: purges abandoned assignments, expires old interceptors
//! and releases claims nothing is resolving.

use std::collections::{BTreeMap, BTreeSet};

use bulwark_core::config::CoordinationConfig;
use bulwark_core::enums::SafeReason;
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::CoordinationStats;
use bulwark_core::types::ThreatId;
use tracing::warn;

use crate::assignment::AssignmentLedger;
use crate::collaborators::Threat;
use crate::interceptor::InterceptorRegistry;

#[allow(clippy::too_many_arguments)]
pub fn run<T: Threat>(
    threats: &BTreeMap<ThreatId, &T>,
    destroyed: &BTreeSet<ThreatId>,
    assignments: &mut AssignmentLedger,
    registry: &mut InterceptorRegistry,
    config: &CoordinationConfig,
    now: f64,
    events: &mut Vec<CoordinationEvent>,
    stats: &mut CoordinationStats,
) {
    for (threat, age_secs) in assignments.purge_stale(now, config.assignment_ttl_secs) {
        warn!(threat = %threat, age_secs, "purged stale assignment");
        stats.assignments_expired += 1;
        events.push(CoordinationEvent::AssignmentExpired { threat, age_secs });
    }

    for id in registry.expired(now, config.interceptor_ttl_secs) {
        if let Some(interceptor) = registry.remove(id) {
            warn!(interceptor = %id, target = %interceptor.target, "expired in-flight interceptor");
            assignments.release(interceptor.target, interceptor.unit, interceptor.assignment);
            stats.self_destructs += 1;
            events.push(CoordinationEvent::SelfDestruct {
                interceptor: id,
                reason: SafeReason::Expired,
            });
        }
    }

    for (id, threat) in threats {
        if !threat.is_active() || destroyed.contains(id) {
            continue;
        }
        if threat.is_being_intercepted() && registry.referencing(*id) == 0 {
            warn!(threat = %id, "released orphaned intercept claim");
            threat.unmark_as_being_intercepted();
            stats.claims_repaired += 1;
            events.push(CoordinationEvent::ClaimRepaired { threat: *id });
        }
    }
}
