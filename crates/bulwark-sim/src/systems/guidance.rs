//! Interceptor guidance: lead pursuit of the current target.
//!
//! Each tick the interceptor re-solves the intercept against its target's
//! present kinematics and turns onto the solution. With no live target it
//! holds its heading until the coordinator retargets or safes it.

use hecs::{Entity, World};

use bulwark_coord::{LeadSolver, TrajectoryService};
use bulwark_core::types::{Position, Velocity};

use crate::components::{EntityIndex, InterceptorBody, ThreatBody};

pub fn run(world: &mut World, index: &EntityIndex, solver: &LeadSolver) {
    let mut steer: Vec<(Entity, Velocity)> = Vec::new();

    {
        let mut query = world.query::<(&InterceptorBody, &Position)>();
        for (entity, (body, pos)) in query.iter() {
            let Some(target) = index.threat(body.target) else {
                continue;
            };
            let Some((target_pos, target_vel)) = live_target(world, target) else {
                continue;
            };
            let aim = solver
                .intercept(pos, &target_pos, &target_vel, body.speed)
                .map_or(target_pos, |s| s.point);
            steer.push((entity, Velocity::toward(pos, &aim, body.speed)));
        }
    }

    for (entity, velocity) in steer {
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = velocity;
        }
    }
}

/// Kinematics of a target that is still active.
pub fn live_target(world: &World, entity: Entity) -> Option<(Position, Velocity)> {
    let body = world.get::<&ThreatBody>(entity).ok()?;
    if !body.active {
        return None;
    }
    let pos = *world.get::<&Position>(entity).ok()?;
    let vel = *world.get::<&Velocity>(entity).ok()?;
    Some((pos, vel))
}
