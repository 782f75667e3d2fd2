//! Cleanup system: removes interceptors that ran dry or left the world, and
//! despawns threats that are no longer active.

use hecs::World;
use tracing::debug;

use bulwark_coord::CoordinationContext;
use bulwark_core::constants::{DT, WORLD_RADIUS};
use bulwark_core::types::{InterceptorId, Position, ThreatId};

use crate::components::{EntityIndex, InterceptorBody, ThreatBody};

/// Burn interceptor fuel and drop the ones that are spent or out of bounds.
/// Each loss is reported so the coordinator frees its assignment share.
pub fn interceptors(world: &mut World, index: &mut EntityIndex, coordination: &mut CoordinationContext) {
    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;
    let mut lost: Vec<InterceptorId> = Vec::new();

    for (_entity, (body, pos)) in world.query_mut::<(&mut InterceptorBody, &Position)>() {
        body.fuel_secs -= DT;
        let out_of_bounds = pos.x * pos.x + pos.y * pos.y > radius_sq;
        if body.fuel_secs <= 0.0 || out_of_bounds {
            lost.push(body.id);
        }
    }
    lost.sort();

    for id in lost {
        coordination.report_interceptor_lost(id);
        if let Some(entity) = index.remove_interceptor(id) {
            let _ = world.despawn(entity);
        }
        debug!(interceptor = %id, "interceptor lost");
    }
}

/// Despawn every inactive threat.
pub fn threats(world: &mut World, index: &mut EntityIndex) {
    let mut gone: Vec<ThreatId> = Vec::new();
    for (_entity, body) in world.query_mut::<&ThreatBody>() {
        if !body.active {
            gone.push(body.id);
        }
    }

    for id in gone {
        if let Some(entity) = index.remove_threat(id) {
            let _ = world.despawn(entity);
        }
    }
}
