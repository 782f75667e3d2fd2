//! Driver-side defending units.
//!
//! A `SimUnit` is either a magazine-fed battery that reloads one round at a
//! time or an energy emitter that recharges continuously. Both present the
//! same `DefendingUnit` capability set; launches are queued in an outbox that
//! the engine drains into interceptor entities after each coordinator tick.

use bulwark_coord::{CapabilityEnvelope, DefendingUnit, FireRequest};
use bulwark_core::constants::*;
use bulwark_core::enums::AmmoModel;
use bulwark_core::types::{InterceptorId, Position, ThreatId, UnitId};
use tracing::debug;

/// How a unit stores its shots.
#[derive(Debug, Clone, PartialEq)]
pub enum Armament {
    Magazine {
        rounds: u32,
        capacity: u32,
        reload_secs: f64,
        reload_timer: f64,
    },
    Energy {
        charge: f64,
        capacity: f64,
        shot_cost: f64,
        recharge_rate: f64,
    },
}

/// An interceptor the unit has committed to launch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOrder {
    pub id: InterceptorId,
    pub threat: ThreatId,
    pub aim_point: Position,
}

#[derive(Debug, Clone)]
pub struct SimUnit {
    pub id: UnitId,
    pub position: Position,
    pub operational: bool,
    armament: Armament,
    max_range: f64,
    min_range: f64,
    projectile_speed: f64,
    base_pk: f64,
    last_fired_at: Option<f64>,
    next_seq: u64,
    outbox: Vec<LaunchOrder>,
}

impl SimUnit {
    /// A full missile battery.
    pub fn battery(id: UnitId, position: Position) -> Self {
        Self {
            id,
            position,
            operational: true,
            armament: Armament::Magazine {
                rounds: BATTERY_MAGAZINE,
                capacity: BATTERY_MAGAZINE,
                reload_secs: BATTERY_RELOAD_SECS,
                reload_timer: 0.0,
            },
            max_range: BATTERY_MAX_RANGE,
            min_range: BATTERY_MIN_RANGE,
            projectile_speed: BATTERY_PROJECTILE_SPEED,
            base_pk: BATTERY_BASE_PK,
            last_fired_at: None,
            next_seq: 0,
            outbox: Vec::new(),
        }
    }

    /// A fully charged energy emitter.
    pub fn emitter(id: UnitId, position: Position) -> Self {
        Self {
            id,
            position,
            operational: true,
            armament: Armament::Energy {
                charge: EMITTER_CAPACITY,
                capacity: EMITTER_CAPACITY,
                shot_cost: EMITTER_SHOT_COST,
                recharge_rate: EMITTER_RECHARGE_RATE,
            },
            max_range: EMITTER_MAX_RANGE,
            min_range: 0.0,
            projectile_speed: EMITTER_PROJECTILE_SPEED,
            base_pk: EMITTER_BASE_PK,
            last_fired_at: None,
            next_seq: 0,
            outbox: Vec::new(),
        }
    }

    pub fn armament(&self) -> &Armament {
        &self.armament
    }

    pub fn projectile_speed(&self) -> f64 {
        self.projectile_speed
    }

    pub fn base_pk(&self) -> f64 {
        self.base_pk
    }

    /// Seconds of powered flight an interceptor from this unit carries.
    pub fn interceptor_fuel_secs(&self) -> f64 {
        self.max_range / self.projectile_speed * INTERCEPTOR_FUEL_MARGIN
    }

    /// Advance reload or recharge by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        match &mut self.armament {
            Armament::Magazine {
                rounds,
                capacity,
                reload_secs,
                reload_timer,
            } => {
                if *rounds >= *capacity {
                    *reload_timer = 0.0;
                    return;
                }
                *reload_timer += dt;
                if *reload_timer >= *reload_secs {
                    *rounds += 1;
                    *reload_timer = 0.0;
                }
            }
            Armament::Energy {
                charge,
                capacity,
                recharge_rate,
                ..
            } => {
                *charge = (*charge + *recharge_rate * dt).min(*capacity);
            }
        }
    }

    /// Take all launches queued since the last drain.
    pub fn drain_launches(&mut self) -> Vec<LaunchOrder> {
        std::mem::take(&mut self.outbox)
    }

    fn consume_shot(&mut self) {
        match &mut self.armament {
            Armament::Magazine { rounds, .. } => *rounds = rounds.saturating_sub(1),
            Armament::Energy {
                charge, shot_cost, ..
            } => *charge = (*charge - *shot_cost).max(0.0),
        }
    }

    fn mint_id(&mut self) -> InterceptorId {
        self.next_seq += 1;
        InterceptorId(((self.id.0 as u64) << 32) | self.next_seq)
    }
}

impl DefendingUnit for SimUnit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_operational(&self) -> bool {
        self.operational
    }

    fn envelope(&self) -> CapabilityEnvelope {
        let (magazine_size, reload_secs) = match &self.armament {
            Armament::Magazine {
                capacity,
                reload_secs,
                ..
            } => (*capacity, *reload_secs),
            Armament::Energy {
                capacity,
                shot_cost,
                recharge_rate,
                ..
            } => ((capacity / shot_cost) as u32, shot_cost / recharge_rate),
        };
        CapabilityEnvelope {
            min_range: self.min_range,
            max_range: self.max_range,
            projectile_speed: self.projectile_speed,
            magazine_size,
            reload_secs,
            base_success_probability: self.base_pk,
        }
    }

    fn available_ammo(&self) -> u32 {
        match &self.armament {
            Armament::Magazine { rounds, .. } => *rounds,
            Armament::Energy {
                charge, shot_cost, ..
            } => (charge / shot_cost) as u32,
        }
    }

    fn last_fired_at(&self) -> Option<f64> {
        self.last_fired_at
    }

    fn ammo_model(&self) -> AmmoModel {
        match self.armament {
            Armament::Magazine { .. } => AmmoModel::Magazine,
            Armament::Energy { .. } => AmmoModel::Energy,
        }
    }

    fn fire(&mut self, request: &FireRequest, on_created: &mut dyn FnMut(InterceptorId)) -> u32 {
        if !self.operational {
            return 0;
        }
        let shots = request.count.min(self.available_ammo());
        for _ in 0..shots {
            self.consume_shot();
            let id = self.mint_id();
            self.outbox.push(LaunchOrder {
                id,
                threat: request.threat,
                aim_point: request.aim_point,
            });
            on_created(id);
        }
        if shots > 0 {
            self.last_fired_at = Some(request.now);
            debug!(unit = %self.id, threat = %request.threat, shots, "unit fired");
        }
        shots
    }
}
