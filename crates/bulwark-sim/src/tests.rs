//! Tests for the reference driver: determinism, end-to-end engagement,
//! repurposing under external removal, and unit ammunition models.

use std::collections::BTreeMap;

use bulwark_coord::{DefendingUnit, FireRequest};
use bulwark_core::config::CoordinationConfig;
use bulwark_core::enums::{AmmoModel, ScenarioId, ThreatArchetype, ThreatClass};
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::SimSnapshot;
use bulwark_core::types::{Position, ThreatId, UnitId};
use glam::DVec3;

use crate::engine::{SimConfig, SimulationEngine};
use crate::error::SimError;
use crate::systems::intercept::closest_approach;
use crate::units::{Armament, SimUnit};

const MAX_TICKS: usize = 4_000;

fn engine(scenario: ScenarioId, seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        scenario,
        ..Default::default()
    })
    .unwrap()
}

/// Run until the engine reports finished, collecting every snapshot.
fn run_to_end(engine: &mut SimulationEngine) -> Vec<SimSnapshot> {
    let mut snaps = Vec::new();
    for _ in 0..MAX_TICKS {
        snaps.push(engine.tick());
        if engine.is_finished() {
            break;
        }
    }
    snaps
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine(ScenarioId::Saturation, 12345);
    let mut engine_b = engine(ScenarioId::Saturation, 12345);

    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(ScenarioId::Saturation, 111);
    let mut engine_b = engine(ScenarioId::Saturation, 222);

    let mut diverged = false;
    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- End-to-end ----

#[test]
fn test_skirmish_runs_to_completion() {
    let mut engine = engine(ScenarioId::Skirmish, 42);
    run_to_end(&mut engine);

    assert!(engine.is_finished(), "skirmish should finish");
    let score = engine.score();
    assert_eq!(score.threats_spawned, 6);
    assert!(score.interceptors_fired > 0);
    assert!(score.threats_killed > 0, "battery should kill something");
    assert_eq!(
        score.threats_spawned,
        score.threats_killed + score.threats_impacted + score.threats_fragmented
    );
}

#[test]
fn test_every_threat_accounted_for_in_all_scenarios() {
    for scenario in [
        ScenarioId::Skirmish,
        ScenarioId::Saturation,
        ScenarioId::HighValueRaid,
    ] {
        let mut engine = engine(scenario, 7);
        run_to_end(&mut engine);
        assert!(engine.is_finished(), "{scenario:?} did not finish");

        let score = engine.score().clone();
        assert_eq!(
            score.threats_spawned,
            score.threats_killed + score.threats_impacted + score.threats_fragmented,
            "{scenario:?}: threats lost track of"
        );
        let stats = engine.coordination().stats();
        assert_eq!(score.threats_killed, stats.interceptions_succeeded);
        assert_eq!(score.interceptors_fired, stats.interceptors_launched);
        assert_eq!(stats.in_flight, 0);
        assert_eq!(stats.active_assignments, 0);
    }
}

#[test]
fn test_no_threat_credited_twice() {
    let mut engine = engine(ScenarioId::Saturation, 99);
    let snaps = run_to_end(&mut engine);

    let mut kills: BTreeMap<ThreatId, u32> = BTreeMap::new();
    for snap in &snaps {
        for event in &snap.events {
            if let CoordinationEvent::InterceptionSucceeded { threat, .. } = event {
                *kills.entry(*threat).or_default() += 1;
            }
        }
    }
    assert!(!kills.is_empty());
    assert!(kills.values().all(|&n| n == 1), "double credit: {kills:?}");
}

#[test]
fn test_interceptor_registry_matches_world() {
    let mut engine = engine(ScenarioId::HighValueRaid, 5);
    for snap in run_to_end(&mut engine) {
        assert_eq!(snap.stats.in_flight, snap.interceptors.len());
        let live: Vec<ThreatId> = snap.threats.iter().map(|t| t.id).collect();
        for interceptor in &snap.interceptors {
            assert!(
                live.contains(&interceptor.target),
                "interceptor {} flying at dead target {}",
                interceptor.id,
                interceptor.target
            );
        }
    }
}

#[test]
fn test_in_flight_cap_holds_under_saturation() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        scenario: ScenarioId::Saturation,
        coordination: CoordinationConfig {
            max_in_flight: 4,
            ..Default::default()
        },
    })
    .unwrap();

    let snaps = run_to_end(&mut engine);
    assert!(snaps.iter().all(|s| s.interceptors.len() <= 4));
    assert!(snaps.iter().any(|s| s.interceptors.len() == 4));
}

#[test]
fn test_uncoordinated_mode_still_defends() {
    let mut engine = engine(ScenarioId::Skirmish, 42);
    engine.set_coordination_enabled(false);
    run_to_end(&mut engine);

    assert!(engine.is_finished());
    assert!(engine.score().interceptors_fired > 0);
}

#[test]
fn test_inoperative_unit_never_fires() {
    let mut engine = engine(ScenarioId::Skirmish, 42);
    assert!(engine.set_unit_operational(UnitId(1), false));
    assert!(!engine.set_unit_operational(UnitId(9), false));

    for _ in 0..600 {
        engine.tick();
    }
    assert_eq!(engine.score().interceptors_fired, 0);
}

// ---- Removal paths ----

#[test]
fn test_external_destruction_repurposes_interceptors() {
    let mut engine = engine(ScenarioId::Skirmish, 42);
    let doomed = engine.spawn_threat_at(
        ThreatArchetype::CruiseMissile,
        Position::new(0.0, 900.0, 0.0),
        Position::default(),
    );

    let snap = engine.tick();
    let chasing: Vec<_> = snap
        .interceptors
        .iter()
        .filter(|i| i.target == doomed)
        .map(|i| i.id)
        .collect();
    assert!(!chasing.is_empty(), "threat in range should be engaged at once");

    assert!(engine.destroy_threat_externally(doomed));
    assert!(!engine.destroy_threat_externally(doomed));
    let snap = engine.tick();

    for id in chasing {
        let handled = snap.events.iter().any(|e| match e {
            CoordinationEvent::Retarget {
                interceptor, from, ..
            } => *interceptor == id && *from == doomed,
            CoordinationEvent::SelfDestruct { interceptor, .. } => *interceptor == id,
            _ => false,
        });
        assert!(handled, "interceptor {id} left chasing a dead threat");
    }
    assert!(snap.interceptors.iter().all(|i| i.target != doomed));
    assert!(snap.assignments.iter().all(|a| a.threat != doomed));
    assert_eq!(engine.score().threats_fragmented, 1);
}

#[test]
fn test_heavy_warhead_breaks_up_into_rockets() {
    let mut engine = engine(ScenarioId::Skirmish, 42);
    let parent_pos = Position::new(0.0, 1_000.0, 0.0);
    let warhead = engine.spawn_threat_at(
        ThreatArchetype::HeavyWarhead,
        parent_pos,
        Position::new(0.0, 310.0, 0.0),
    );

    let snap = engine.tick();

    assert_eq!(engine.score().threats_fragmented, 1);
    assert!(snap.threats.iter().all(|t| t.id != warhead));
    let fragments = snap
        .threats
        .iter()
        .filter(|t| t.class == ThreatClass::Ordinary && t.position.range_to(&parent_pos) < 10.0)
        .count();
    assert_eq!(fragments, 3);
}

// ---- Config ----

#[test]
fn test_invalid_policy_rejected() {
    let result = SimulationEngine::new(SimConfig {
        coordination: CoordinationConfig {
            max_in_flight: 0,
            ..Default::default()
        },
        ..Default::default()
    });
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn test_sim_config_partial_json() {
    let config: SimConfig =
        serde_json::from_str(r#"{ "seed": 7, "scenario": "Saturation" }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.scenario, ScenarioId::Saturation);
    assert_eq!(config.coordination, CoordinationConfig::default());
}

// ---- Units ----

fn request(count: u32) -> FireRequest {
    FireRequest {
        threat: ThreatId(1),
        count,
        aim_point: Position::new(0.0, 500.0, 0.0),
        flight_time_secs: 2.0,
        now: 1.0,
    }
}

#[test]
fn test_battery_fires_and_reloads() {
    let mut battery = SimUnit::battery(UnitId(1), Position::default());
    assert_eq!(battery.ammo_model(), AmmoModel::Magazine);
    assert_eq!(battery.envelope().magazine_size, 16);

    let mut ids = Vec::new();
    let fired = battery.fire(&request(2), &mut |id| ids.push(id));
    assert_eq!(fired, 2);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(battery.available_ammo(), 14);
    assert_eq!(battery.last_fired_at(), Some(1.0));
    assert_eq!(battery.drain_launches().len(), 2);
    assert!(battery.drain_launches().is_empty());

    // One round back per reload interval.
    for _ in 0..(4 * 30 + 1) {
        battery.update(1.0 / 30.0);
    }
    assert_eq!(battery.available_ammo(), 15);
}

#[test]
fn test_emitter_spends_and_recharges_energy() {
    let mut emitter = SimUnit::emitter(UnitId(2), Position::default());
    assert_eq!(emitter.ammo_model(), AmmoModel::Energy);
    let envelope = emitter.envelope();
    assert_eq!(envelope.magazine_size, 8);
    assert!((envelope.reload_secs - 2.5).abs() < 1e-9);

    let fired = emitter.fire(&request(3), &mut |_| {});
    assert_eq!(fired, 3);
    assert_eq!(emitter.available_ammo(), 5);

    emitter.update(2.5);
    assert_eq!(emitter.available_ammo(), 6);
    emitter.update(100.0);
    assert_eq!(emitter.available_ammo(), 8, "charge is capped at capacity");
    assert!(matches!(emitter.armament(), Armament::Energy { charge, .. } if *charge == 100.0));
}

#[test]
fn test_inoperative_unit_declines_fire() {
    let mut battery = SimUnit::battery(UnitId(1), Position::default());
    battery.operational = false;
    assert_eq!(battery.fire(&request(1), &mut |_| {}), 0);
    assert_eq!(battery.available_ammo(), 16);
}

#[test]
fn test_interceptor_ids_unique_across_units() {
    let mut a = SimUnit::battery(UnitId(1), Position::default());
    let mut b = SimUnit::battery(UnitId(2), Position::default());
    let mut ids = Vec::new();
    a.fire(&request(3), &mut |id| ids.push(id));
    b.fire(&request(3), &mut |id| ids.push(id));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

// ---- Geometry ----

#[test]
fn test_closest_approach_within_step() {
    // Closing head-on at 300 m/s from 6 m apart: contact inside one 1/30 s step.
    let (miss, t) = closest_approach(DVec3::new(6.0, 0.0, 0.0), DVec3::new(-300.0, 0.0, 0.0), 1.0 / 30.0);
    assert!(miss < 1e-9);
    assert!((t - 0.02).abs() < 1e-9);

    // Receding: closest approach is now.
    let (miss, t) = closest_approach(DVec3::new(6.0, 0.0, 0.0), DVec3::new(50.0, 0.0, 0.0), 1.0 / 30.0);
    assert!((miss - 6.0).abs() < 1e-9);
    assert_eq!(t, 0.0);

    // Crossing with a 3 m offset.
    let (miss, _) = closest_approach(DVec3::new(5.0, 3.0, 0.0), DVec3::new(-300.0, 0.0, 0.0), 1.0 / 30.0);
    assert!((miss - 3.0).abs() < 1e-9);
}
