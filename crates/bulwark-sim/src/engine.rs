//! Simulation engine for the reference driver.
//!
//! `SimulationEngine` owns the hecs world, the defending units and the
//! coordination context, runs all systems in a fixed order each tick and
//! produces `SimSnapshot`s. Completely headless and deterministic per seed.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bulwark_coord::{CoordinationContext, LeadSolver};
use bulwark_core::config::CoordinationConfig;
use bulwark_core::constants::DT;
use bulwark_core::enums::{ScenarioId, ThreatArchetype};
use bulwark_core::events::CoordinationEvent;
use bulwark_core::state::{ScoreView, SimSnapshot};
use bulwark_core::types::{Position, SimTime, ThreatId, UnitId, Velocity};

use crate::components::{EntityIndex, InterceptorBody, ThreatBody, ThreatRef};
use crate::error::SimError;
use crate::scenario;
use crate::systems;
use crate::systems::wave_spawner::WaveSchedule;
use crate::units::SimUnit;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub coordination: CoordinationConfig,
    pub scenario: ScenarioId,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            coordination: CoordinationConfig::default(),
            scenario: ScenarioId::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    index: EntityIndex,
    units: Vec<SimUnit>,
    coordination: CoordinationContext,
    solver: LeadSolver,
    wave_schedule: WaveSchedule,
    score: ScoreView,
    events: Vec<CoordinationEvent>,
}

impl SimulationEngine {
    /// Deploy the scenario's units and register them with a fresh coordinator.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.coordination.validate()?;

        let units = world_setup::deploy_units(config.scenario);
        let mut coordination = CoordinationContext::new(config.coordination);
        for unit in &units {
            coordination.register_unit(unit)?;
        }
        info!(
            scenario = ?config.scenario,
            seed = config.seed,
            units = units.len(),
            "simulation initialised"
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            index: EntityIndex::default(),
            units,
            coordination,
            solver: LeadSolver,
            wave_schedule: scenario::build_schedule(config.scenario),
            score: ScoreView::default(),
            events: Vec::new(),
        })
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.run_systems();
        self.time.advance();

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build(
            &self.world,
            &self.time,
            &self.index,
            &self.units,
            &self.coordination,
            &self.score,
            events,
        )
    }

    /// True once every wave has spawned and nothing is left in the air.
    pub fn is_finished(&self) -> bool {
        self.wave_schedule.is_exhausted()
            && self.index.threat_count() == 0
            && self.index.interceptor_count() == 0
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn score(&self) -> &ScoreView {
        &self.score
    }

    pub fn units(&self) -> &[SimUnit] {
        &self.units
    }

    pub fn coordination(&self) -> &CoordinationContext {
        &self.coordination
    }

    pub fn set_coordination_enabled(&mut self, enabled: bool) {
        self.coordination.set_coordination_enabled(enabled);
    }

    /// Take a unit out of (or back into) action.
    pub fn set_unit_operational(&mut self, unit: UnitId, operational: bool) -> bool {
        match self.units.iter_mut().find(|u| u.id == unit) {
            Some(u) => {
                u.operational = operational;
                true
            }
            None => false,
        }
    }

    /// Spawn a threat at an exact position, outside any wave schedule.
    pub fn spawn_threat_at(
        &mut self,
        archetype: ThreatArchetype,
        position: Position,
        target: Position,
    ) -> ThreatId {
        self.score.threats_spawned += 1;
        world_setup::spawn_threat_at(&mut self.world, &mut self.index, archetype, position, target)
    }

    /// Destroy a threat by means the coordinator did not arrange (debris,
    /// another defensive layer). Returns false if the threat is not live.
    pub fn destroy_threat_externally(&mut self, id: ThreatId) -> bool {
        let Some(entity) = self.index.threat(id) else {
            return false;
        };
        let Ok(mut body) = self.world.get::<&mut ThreatBody>(entity) else {
            return false;
        };
        if !body.active {
            return false;
        }
        body.active = false;
        self.coordination.notify_threat_removed(id);
        self.score.threats_fragmented += 1;
        debug!(threat = %id, "threat destroyed externally");
        true
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;

        // 1. Wave spawning
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.wave_schedule,
            &mut self.index,
            &mut self.score,
            self.time.tick,
        );
        // 2. Reload / recharge
        for unit in &mut self.units {
            unit.update(DT);
        }
        // 3. Threat impact and break-up
        systems::impact::run(
            &mut self.world,
            &mut self.rng,
            &mut self.index,
            &mut self.coordination,
            &mut self.score,
        );
        // 4. Interceptor guidance
        systems::guidance::run(&mut self.world, &self.index, &self.solver);
        // 5. Intercept (proximity over the coming step, Pk roll)
        systems::intercept::run(
            &mut self.world,
            &mut self.index,
            &mut self.rng,
            &mut self.coordination,
        );
        // 6. Movement integration
        systems::movement::run(&mut self.world);
        // 7. Interceptor fuel and bounds
        systems::cleanup::interceptors(&mut self.world, &mut self.index, &mut self.coordination);
        // 8. Coordination: resolution, repurposing, allocation
        self.coordinate(now);
        // 9. Despawn dead threats
        systems::cleanup::threats(&mut self.world, &mut self.index);
    }

    /// Feed the coordinator this tick's world and apply what it decided.
    fn coordinate(&mut self, now: f64) {
        for (id, entity) in self.index.interceptors() {
            if let Ok(pos) = self.world.get::<&Position>(entity) {
                self.coordination.report_interceptor_position(id, *pos);
            }
        }

        let report = {
            let mut query = self.world.query::<(&ThreatBody, &Position, &Velocity)>();
            let threats: Vec<ThreatRef<'_>> = query
                .iter()
                .map(|(_, (body, pos, vel))| ThreatRef::new(body, *pos, *vel))
                .collect();
            self.coordination.tick(now, &threats, &mut self.units)
        };

        for unit_idx in 0..self.units.len() {
            let origin = self.units[unit_idx].position;
            let unit_id = self.units[unit_idx].id;
            let speed = self.units[unit_idx].projectile_speed();
            let fuel_secs = self.units[unit_idx].interceptor_fuel_secs();
            let base_pk = self.units[unit_idx].base_pk();
            for order in self.units[unit_idx].drain_launches() {
                let body = InterceptorBody {
                    id: order.id,
                    unit: unit_id,
                    target: order.threat,
                    speed,
                    fuel_secs,
                    base_pk,
                };
                let velocity = Velocity::toward(&origin, &order.aim_point, speed);
                let entity = self.world.spawn((body, origin, velocity));
                self.index.insert_interceptor(order.id, entity);
                self.score.interceptors_fired += 1;
            }
        }

        for event in &report.events {
            self.apply_event(event);
        }
        self.events.extend(report.events);
    }

    fn apply_event(&mut self, event: &CoordinationEvent) {
        match event {
            CoordinationEvent::InterceptionSucceeded { threat, .. } => {
                let Some(entity) = self.index.threat(*threat) else {
                    return;
                };
                if let Ok(mut body) = self.world.get::<&mut ThreatBody>(entity) {
                    body.active = false;
                    self.score.threats_killed += 1;
                }
            }
            CoordinationEvent::Retarget { interceptor, to, .. } => {
                let Some(entity) = self.index.interceptor(*interceptor) else {
                    return;
                };
                if let Ok(mut body) = self.world.get::<&mut InterceptorBody>(entity) {
                    body.target = *to;
                }
            }
            CoordinationEvent::SelfDestruct { interceptor, .. } => {
                if let Some(entity) = self.index.remove_interceptor(*interceptor) {
                    let _ = self.world.despawn(entity);
                }
            }
            CoordinationEvent::InterceptorLaunched { .. }
            | CoordinationEvent::InterceptionFailed { .. }
            | CoordinationEvent::AssignmentExpired { .. }
            | CoordinationEvent::ClaimRepaired { .. } => {}
        }
    }
}
