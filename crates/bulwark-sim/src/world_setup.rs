//! Entity spawn factories: defending units per scenario and threat entities.

use std::f64::consts::TAU;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_coord::InterceptClaim;
use bulwark_core::constants::*;
use bulwark_core::enums::{ScenarioId, ThreatArchetype, ThreatClass};
use bulwark_core::types::{Position, ThreatId, UnitId, Velocity};

use crate::components::{EntityIndex, ThreatBody};
use crate::units::SimUnit;

/// Defending units deployed for a scenario, in ascending id order.
pub fn deploy_units(scenario: ScenarioId) -> Vec<SimUnit> {
    match scenario {
        ScenarioId::Skirmish => vec![SimUnit::battery(UnitId(1), Position::new(0.0, 0.0, 0.0))],
        ScenarioId::Saturation => vec![
            SimUnit::battery(UnitId(1), Position::new(-300.0, 0.0, 0.0)),
            SimUnit::battery(UnitId(2), Position::new(300.0, 0.0, 0.0)),
            SimUnit::emitter(UnitId(3), Position::new(0.0, 100.0, 0.0)),
        ],
        ScenarioId::HighValueRaid => vec![
            SimUnit::battery(UnitId(1), Position::new(0.0, -200.0, 0.0)),
            SimUnit::emitter(UnitId(2), Position::new(0.0, 150.0, 0.0)),
        ],
    }
}

/// Kinematic and policy parameters for an archetype:
/// (speed m/s, class, break-up range).
pub fn archetype_params(archetype: ThreatArchetype) -> (f64, ThreatClass, Option<f64>) {
    match archetype {
        ThreatArchetype::Rocket => (ROCKET_SPEED, ThreatClass::Ordinary, None),
        ThreatArchetype::CruiseMissile => (CRUISE_MISSILE_SPEED, ThreatClass::Ordinary, None),
        ThreatArchetype::HeavyWarhead => (
            HEAVY_WARHEAD_SPEED,
            ThreatClass::HighValue,
            Some(FRAGMENT_RANGE),
        ),
    }
}

/// Spawn a threat on the spawn ring, heading for a scattered point near the
/// origin. `bearing` is measured clockwise from North; `None` picks one at random.
pub fn spawn_threat(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    index: &mut EntityIndex,
    archetype: ThreatArchetype,
    bearing: Option<f64>,
) -> ThreatId {
    let bearing = bearing.unwrap_or_else(|| rng.gen_range(0.0..TAU));
    let range: f64 = rng.gen_range(THREAT_SPAWN_RANGE_MIN..THREAT_SPAWN_RANGE_MAX);
    let position = Position::new(range * bearing.sin(), range * bearing.cos(), 0.0);
    let target = scattered_point(rng, &Position::default(), TARGET_SCATTER);
    spawn_threat_at(world, index, archetype, position, target)
}

/// Spawn a threat at an exact position flying straight at `target`.
pub fn spawn_threat_at(
    world: &mut World,
    index: &mut EntityIndex,
    archetype: ThreatArchetype,
    position: Position,
    target: Position,
) -> ThreatId {
    let (speed, class, fragment_at_range) = archetype_params(archetype);
    let id = index.mint_threat_id();
    let body = ThreatBody {
        id,
        archetype,
        class,
        target,
        active: true,
        fragment_at_range,
        claim: InterceptClaim::new(),
    };
    let entity = world.spawn((body, position, Velocity::toward(&position, &target, speed)));
    index.insert_threat(id, entity);
    id
}

/// Uniformly random point on the ground within `radius` of `center`.
pub fn scattered_point(rng: &mut ChaCha8Rng, center: &Position, radius: f64) -> Position {
    let angle: f64 = rng.gen_range(0.0..TAU);
    let dist = radius * rng.gen::<f64>().sqrt();
    Position::new(
        center.x + dist * angle.sin(),
        center.y + dist * angle.cos(),
        center.z,
    )
}
