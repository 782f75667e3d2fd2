//! Scenario definitions: hardcoded wave schedules.

use std::f64::consts::PI;

use bulwark_core::constants::TICK_RATE;
use bulwark_core::enums::{ScenarioId, ThreatArchetype};

use crate::systems::wave_spawner::{WaveEntry, WaveSchedule};

/// Build the wave schedule for a given scenario.
pub fn build_schedule(scenario: ScenarioId) -> WaveSchedule {
    match scenario {
        ScenarioId::Skirmish => build_skirmish(),
        ScenarioId::Saturation => build_saturation(),
        ScenarioId::HighValueRaid => build_high_value_raid(),
    }
}

/// Skirmish: 2 waves, 6 rockets, all from the North.
fn build_skirmish() -> WaveSchedule {
    let north = 0.0;

    WaveSchedule {
        waves: vec![
            WaveEntry::with_bearing(0, vec![(ThreatArchetype::Rocket, 3)], north),
            WaveEntry::with_bearing(
                secs_to_ticks(8.0),
                vec![(ThreatArchetype::Rocket, 3)],
                north,
            ),
        ],
    }
}

/// Saturation: 4 waves, 26 threats from three axes inside 15 seconds.
/// Enough at once to press against the global in-flight cap.
fn build_saturation() -> WaveSchedule {
    let north = 0.0;
    let east = PI / 2.0;
    let southwest = PI * 1.25;

    WaveSchedule {
        waves: vec![
            WaveEntry::with_bearing(0, vec![(ThreatArchetype::Rocket, 6)], north),
            WaveEntry::with_bearing(
                secs_to_ticks(3.0),
                vec![
                    (ThreatArchetype::Rocket, 4),
                    (ThreatArchetype::CruiseMissile, 2),
                ],
                east,
            ),
            WaveEntry::with_bearing(
                secs_to_ticks(8.0),
                vec![(ThreatArchetype::CruiseMissile, 6)],
                southwest,
            ),
            WaveEntry::random(
                secs_to_ticks(15.0),
                vec![
                    (ThreatArchetype::Rocket, 6),
                    (ThreatArchetype::CruiseMissile, 2),
                ],
            ),
        ],
    }
}

/// High-value raid: heavy warheads that break up into rockets, screened by
/// cruise missiles.
fn build_high_value_raid() -> WaveSchedule {
    let north = 0.0;
    let east = PI / 2.0;

    WaveSchedule {
        waves: vec![
            WaveEntry::with_bearing(0, vec![(ThreatArchetype::HeavyWarhead, 2)], north),
            WaveEntry::with_bearing(
                secs_to_ticks(5.0),
                vec![(ThreatArchetype::CruiseMissile, 3)],
                east,
            ),
            WaveEntry::random(
                secs_to_ticks(12.0),
                vec![
                    (ThreatArchetype::HeavyWarhead, 1),
                    (ThreatArchetype::CruiseMissile, 2),
                ],
            ),
        ],
    }
}

/// Convert seconds to ticks.
fn secs_to_ticks(secs: f64) -> u64 {
    (secs * TICK_RATE as f64) as u64
}
