//! ECS components for driver-owned entities.
//!
//! Entities also carry the core `Position` and `Velocity` types directly.

use std::collections::BTreeMap;

use bulwark_coord::{InterceptClaim, Threat};
use bulwark_core::enums::{ThreatArchetype, ThreatClass};
use bulwark_core::types::{InterceptorId, Position, ThreatId, UnitId, Velocity};
use hecs::Entity;

/// An incoming threat flying straight at its aim point.
#[derive(Debug)]
pub struct ThreatBody {
    pub id: ThreatId,
    pub archetype: ThreatArchetype,
    pub class: ThreatClass,
    /// Point the threat will impact.
    pub target: Position,
    /// Cleared on impact, kill or external destruction. Inactive threats are
    /// despawned at the end of the tick.
    pub active: bool,
    /// Range to target at which the threat breaks up, if it does.
    pub fragment_at_range: Option<f64>,
    pub claim: InterceptClaim,
}

/// A launched interceptor.
#[derive(Debug, Clone)]
pub struct InterceptorBody {
    pub id: InterceptorId,
    pub unit: UnitId,
    /// Current target; rewritten by retarget commands.
    pub target: ThreatId,
    pub speed: f64,
    pub fuel_secs: f64,
    pub base_pk: f64,
}

/// Borrowed view of one threat entity handed to the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct ThreatRef<'a> {
    body: &'a ThreatBody,
    position: Position,
    velocity: Velocity,
}

impl<'a> ThreatRef<'a> {
    pub fn new(body: &'a ThreatBody, position: Position, velocity: Velocity) -> Self {
        Self {
            body,
            position,
            velocity,
        }
    }
}

impl Threat for ThreatRef<'_> {
    fn id(&self) -> ThreatId {
        self.body.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn velocity(&self) -> Velocity {
        self.velocity
    }

    fn time_to_impact(&self) -> f64 {
        time_to_impact(&self.position, &self.velocity, &self.body.target)
    }

    fn impact_point(&self) -> Option<Position> {
        Some(self.body.target)
    }

    fn is_active(&self) -> bool {
        self.body.active
    }

    fn class(&self) -> ThreatClass {
        self.body.class
    }

    fn claim(&self) -> &InterceptClaim {
        &self.body.claim
    }
}

/// Seconds until a straight-flying threat reaches its target.
pub fn time_to_impact(position: &Position, velocity: &Velocity, target: &Position) -> f64 {
    let speed = velocity.speed();
    if speed <= 0.0 {
        return f64::INFINITY;
    }
    position.range_to(target) / speed
}

/// Maps coordinator identities to ECS entities. Ordered so that systems
/// visiting entities by id do so deterministically.
#[derive(Debug, Default)]
pub struct EntityIndex {
    threats: BTreeMap<ThreatId, Entity>,
    interceptors: BTreeMap<InterceptorId, Entity>,
    next_threat_id: u32,
}

impl EntityIndex {
    pub fn mint_threat_id(&mut self) -> ThreatId {
        self.next_threat_id += 1;
        ThreatId(self.next_threat_id)
    }

    pub fn insert_threat(&mut self, id: ThreatId, entity: Entity) {
        self.threats.insert(id, entity);
    }

    pub fn threat(&self, id: ThreatId) -> Option<Entity> {
        self.threats.get(&id).copied()
    }

    pub fn remove_threat(&mut self, id: ThreatId) -> Option<Entity> {
        self.threats.remove(&id)
    }

    pub fn threats(&self) -> impl Iterator<Item = (ThreatId, Entity)> + '_ {
        self.threats.iter().map(|(id, e)| (*id, *e))
    }

    pub fn threat_count(&self) -> usize {
        self.threats.len()
    }

    pub fn insert_interceptor(&mut self, id: InterceptorId, entity: Entity) {
        self.interceptors.insert(id, entity);
    }

    pub fn interceptor(&self, id: InterceptorId) -> Option<Entity> {
        self.interceptors.get(&id).copied()
    }

    pub fn remove_interceptor(&mut self, id: InterceptorId) -> Option<Entity> {
        self.interceptors.remove(&id)
    }

    pub fn interceptors(&self) -> impl Iterator<Item = (InterceptorId, Entity)> + '_ {
        self.interceptors.iter().map(|(id, e)| (*id, *e))
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }
}
