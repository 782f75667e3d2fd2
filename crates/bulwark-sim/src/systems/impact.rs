//! Threat terminal events: impact on the defended area and warhead break-up.
//!
//! Both remove the threat from play outside the coordinator's control, so
//! both notify it so in-flight interceptors get repurposed.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use bulwark_coord::CoordinationContext;
use bulwark_core::constants::{FRAGMENT_COUNT, FRAGMENT_SCATTER, THREAT_IMPACT_RANGE};
use bulwark_core::enums::ThreatArchetype;
use bulwark_core::state::ScoreView;
use bulwark_core::types::{Position, ThreatId};

use crate::components::{EntityIndex, ThreatBody};
use crate::world_setup;

enum Terminal {
    Impact,
    BreakUp { at: Position, aim: Position },
}

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    index: &mut EntityIndex,
    coordination: &mut CoordinationContext,
    score: &mut ScoreView,
) {
    let mut terminal: Vec<(ThreatId, Entity, Terminal)> = Vec::new();

    for (entity, (body, pos)) in world.query_mut::<(&ThreatBody, &Position)>() {
        if !body.active {
            continue;
        }
        let range = pos.range_to(&body.target);
        if body.fragment_at_range.is_some_and(|r| range <= r) {
            terminal.push((
                body.id,
                entity,
                Terminal::BreakUp {
                    at: *pos,
                    aim: body.target,
                },
            ));
        } else if range <= THREAT_IMPACT_RANGE {
            terminal.push((body.id, entity, Terminal::Impact));
        }
    }
    // Query order follows archetype storage; resolve by id.
    terminal.sort_by_key(|(id, _, _)| *id);

    for (id, entity, event) in terminal {
        if let Ok(mut body) = world.get::<&mut ThreatBody>(entity) {
            body.active = false;
        }
        coordination.notify_threat_removed(id);

        match event {
            Terminal::Impact => {
                score.threats_impacted += 1;
                debug!(threat = %id, "threat impacted");
            }
            Terminal::BreakUp { at, aim } => {
                score.threats_fragmented += 1;
                for _ in 0..FRAGMENT_COUNT {
                    let fragment_aim = world_setup::scattered_point(rng, &aim, FRAGMENT_SCATTER);
                    world_setup::spawn_threat_at(
                        world,
                        index,
                        ThreatArchetype::Rocket,
                        at,
                        fragment_aim,
                    );
                    score.threats_spawned += 1;
                }
                debug!(threat = %id, fragments = FRAGMENT_COUNT, "warhead broke up");
            }
        }
    }
}
