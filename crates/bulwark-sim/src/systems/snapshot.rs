//! Snapshot builder: queries the world and assembles a `SimSnapshot`.

use hecs::World;

use bulwark_coord::{CoordinationContext, DefendingUnit, Threat};
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::{InterceptorView, ScoreView, SimSnapshot, ThreatView, UnitView};
use bulwark_core::types::{Position, SimTime, Velocity};

use crate::components::{EntityIndex, InterceptorBody, ThreatBody, ThreatRef};
use crate::units::SimUnit;

pub fn build(
    world: &World,
    time: &SimTime,
    index: &EntityIndex,
    units: &[SimUnit],
    coordination: &CoordinationContext,
    score: &ScoreView,
    events: Vec<CoordinationEvent>,
) -> SimSnapshot {
    let mut threats = Vec::with_capacity(index.threat_count());
    for (_id, entity) in index.threats() {
        let (Ok(body), Ok(pos), Ok(vel)) = (
            world.get::<&ThreatBody>(entity),
            world.get::<&Position>(entity),
            world.get::<&Velocity>(entity),
        ) else {
            continue;
        };
        let view = ThreatRef::new(&body, *pos, *vel);
        threats.push(ThreatView {
            id: view.id(),
            class: view.class(),
            position: *pos,
            time_to_impact: view.time_to_impact(),
            being_intercepted: view.is_being_intercepted(),
        });
    }

    let mut interceptors = Vec::with_capacity(index.interceptor_count());
    for (id, entity) in index.interceptors() {
        let (Ok(body), Ok(pos)) = (
            world.get::<&InterceptorBody>(entity),
            world.get::<&Position>(entity),
        ) else {
            continue;
        };
        interceptors.push(InterceptorView {
            id,
            target: body.target,
            position: *pos,
        });
    }

    let units = units
        .iter()
        .map(|u| UnitView {
            id: u.id,
            ammo_model: u.ammo_model(),
            position: u.position,
            available_shots: u.available_ammo(),
            operational: u.operational,
        })
        .collect();

    SimSnapshot {
        time: *time,
        threats,
        interceptors,
        units,
        assignments: coordination.assignments(),
        stats: coordination.stats(),
        score: score.clone(),
        events,
    }
}
