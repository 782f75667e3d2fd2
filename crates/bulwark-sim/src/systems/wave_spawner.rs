//! Wave spawning system: spawns threat waves at scheduled ticks.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use bulwark_core::enums::ThreatArchetype;
use bulwark_core::state::ScoreView;

use crate::components::EntityIndex;
use crate::world_setup;

/// A single wave definition.
#[derive(Debug, Clone)]
pub struct WaveEntry {
    /// Tick at which this wave spawns.
    pub spawn_at_tick: u64,
    /// Threats to spawn: (archetype, count).
    pub threats: Vec<(ThreatArchetype, u32)>,
    /// Approach bearing (radians clockwise from North); `None` is random per threat.
    pub bearing: Option<f64>,
    pub spawned: bool,
}

impl WaveEntry {
    pub fn with_bearing(spawn_at_tick: u64, threats: Vec<(ThreatArchetype, u32)>, bearing: f64) -> Self {
        Self {
            spawn_at_tick,
            threats,
            bearing: Some(bearing),
            spawned: false,
        }
    }

    pub fn random(spawn_at_tick: u64, threats: Vec<(ThreatArchetype, u32)>) -> Self {
        Self {
            spawn_at_tick,
            threats,
            bearing: None,
            spawned: false,
        }
    }
}

/// The complete wave schedule for a scenario.
#[derive(Debug, Clone, Default)]
pub struct WaveSchedule {
    pub waves: Vec<WaveEntry>,
}

impl WaveSchedule {
    /// Total number of threats across all waves (fragments not included).
    pub fn total_threats(&self) -> u32 {
        self.waves
            .iter()
            .flat_map(|w| w.threats.iter())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.waves.iter().all(|w| w.spawned)
    }
}

/// Check the schedule and spawn any due waves.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut WaveSchedule,
    index: &mut EntityIndex,
    score: &mut ScoreView,
    current_tick: u64,
) {
    for wave in &mut schedule.waves {
        if wave.spawned || current_tick < wave.spawn_at_tick {
            continue;
        }
        for &(archetype, count) in &wave.threats {
            for _ in 0..count {
                world_setup::spawn_threat(world, rng, index, archetype, wave.bearing);
                score.threats_spawned += 1;
            }
        }
        wave.spawned = true;
    }
}
