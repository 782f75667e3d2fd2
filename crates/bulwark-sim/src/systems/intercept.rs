//! Intercept evaluation system: checks interceptor-target proximity over the
//! coming tick and reports detonations to the coordinator.
//!
//! The driver rolls the hit; the coordinator decides whether that roll counts.

use glam::DVec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_coord::{CoordinationContext, Detonation};
use bulwark_core::constants::{DT, INTERCEPT_LETHAL_RADIUS, MIN_KILL_QUALITY};
use bulwark_core::types::{InterceptorId, Position, Velocity};

use crate::components::{EntityIndex, InterceptorBody};
use crate::systems::guidance::live_target;

/// Closest approach of two bodies over the next `dt` seconds.
/// Returns (miss distance, seconds until closest approach).
pub fn closest_approach(rel_pos: DVec3, rel_vel: DVec3, dt: f64) -> (f64, f64) {
    let speed_sq = rel_vel.length_squared();
    let t = if speed_sq > 0.0 {
        (-rel_pos.dot(rel_vel) / speed_sq).clamp(0.0, dt)
    } else {
        0.0
    };
    ((rel_pos + rel_vel * t).length(), t)
}

/// Run proximity checks. Detonated interceptors are despawned.
pub fn run(
    world: &mut World,
    index: &mut EntityIndex,
    rng: &mut ChaCha8Rng,
    coordination: &mut CoordinationContext,
) {
    let mut detonated: Vec<InterceptorId> = Vec::new();

    for (id, entity) in index.interceptors() {
        let Ok(body) = world.get::<&InterceptorBody>(entity) else {
            continue;
        };
        let (Ok(pos), Ok(vel)) = (
            world.get::<&Position>(entity),
            world.get::<&Velocity>(entity),
        ) else {
            continue;
        };
        let Some(target) = index.threat(body.target) else {
            continue;
        };
        let Some((target_pos, target_vel)) = live_target(world, target) else {
            continue;
        };

        let rel_pos = target_pos.as_dvec3() - pos.as_dvec3();
        let rel_vel = target_vel.as_dvec3() - vel.as_dvec3();
        let (miss_distance, t) = closest_approach(rel_pos, rel_vel, DT);
        if miss_distance > INTERCEPT_LETHAL_RADIUS {
            continue;
        }

        let quality = 1.0 - miss_distance / INTERCEPT_LETHAL_RADIUS;
        let kill_probability = if quality < MIN_KILL_QUALITY {
            0.0
        } else {
            body.base_pk.clamp(0.0, 1.0)
        };
        let hit = rng.gen_bool(kill_probability);

        coordination.report_detonation(Detonation {
            interceptor: id,
            position: Position::from(pos.as_dvec3() + vel.as_dvec3() * t),
            quality,
            hit,
            kill_probability,
        });
        detonated.push(id);
    }

    for id in detonated {
        if let Some(entity) = index.remove_interceptor(id) {
            let _ = world.despawn(entity);
        }
    }
}
