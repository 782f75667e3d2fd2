//! Unit status ledger: the core's shadow of each registered defending unit.
//!
//! The shadow is advisory. It is rebuilt from the unit's own queries at the
//! start of every tick, and adjusted in between only so that commitments made
//! earlier in the same tick weigh on later scoring.

use std::collections::BTreeMap;

use bulwark_core::constants::ROUNDS_PER_CHANNEL;
use bulwark_core::enums::AmmoModel;
use bulwark_core::error::RegistrationError;
use bulwark_core::types::{Position, UnitId};
use tracing::{debug, warn};

use crate::assignment::AssignmentLedger;
use crate::collaborators::{CapabilityEnvelope, DefendingUnit};

/// Shadow status of one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitStatus {
    pub id: UnitId,
    pub position: Position,
    pub envelope: CapabilityEnvelope,
    pub ammo_model: AmmoModel,
    pub operational: bool,
    pub available_ammo: u32,
    /// Assignments attributed to this unit, plus commitments made this tick.
    pub active_engagements: u32,
    pub last_fired_at: Option<f64>,
}

impl UnitStatus {
    /// Concurrent engagement channels: one per `ROUNDS_PER_CHANNEL` magazine rounds.
    pub fn max_concurrent_engagements(&self) -> u32 {
        self.envelope.magazine_size.div_ceil(ROUNDS_PER_CHANNEL)
    }

    /// Operational with at least one shot available.
    pub fn can_engage(&self) -> bool {
        self.operational && self.available_ammo > 0
    }

    fn observe<U: DefendingUnit + ?Sized>(&mut self, unit: &U) {
        self.position = unit.position();
        self.operational = unit.is_operational();
        self.available_ammo = unit.available_ammo();
        self.last_fired_at = unit.last_fired_at();
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitLedger {
    units: BTreeMap<UnitId, UnitStatus>,
}

impl UnitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the unit's envelope and start shadowing it.
    pub fn register<U: DefendingUnit + ?Sized>(&mut self, unit: &U) -> Result<(), RegistrationError> {
        let id = unit.id();
        if self.units.contains_key(&id) {
            return Err(RegistrationError::DuplicateUnit { unit: id });
        }
        let envelope = unit.envelope();
        if let Err(err) = envelope.validate(id) {
            warn!(unit = %id, error = %err, "rejected unit registration");
            return Err(err);
        }

        let mut status = UnitStatus {
            id,
            position: Position::default(),
            envelope,
            ammo_model: unit.ammo_model(),
            operational: false,
            available_ammo: 0,
            active_engagements: 0,
            last_fired_at: None,
        };
        status.observe(unit);
        debug!(unit = %id, ammo = status.available_ammo, "registered unit");
        self.units.insert(id, status);
        Ok(())
    }

    /// Stop shadowing a unit. Assignment cleanup is the caller's job.
    pub fn unregister(&mut self, id: UnitId) -> Option<UnitStatus> {
        self.units.remove(&id)
    }

    /// Pull a fresh snapshot of one registered unit.
    pub fn refresh_unit<U: DefendingUnit + ?Sized>(
        &mut self,
        unit: &U,
        active_engagements: u32,
    ) -> Option<UnitStatus> {
        let status = self.units.get_mut(&unit.id())?;
        status.observe(unit);
        status.active_engagements = active_engagements;
        Some(status.clone())
    }

    /// Refresh every registered unit from the driver's unit list.
    /// Registered units missing from `units` are treated as non-operational.
    pub fn refresh<U: DefendingUnit>(&mut self, units: &[U], assignments: &AssignmentLedger) {
        for status in self.units.values_mut() {
            status.operational = false;
        }
        for unit in units {
            let engagements = assignments.count_for_unit(unit.id());
            self.refresh_unit(unit, engagements);
        }
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitStatus> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitStatus> {
        self.units.get_mut(&id)
    }

    /// Units in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitStatus> {
        self.units.values()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_active_engagements(&self) -> u32 {
        self.units.values().map(|s| s.active_engagements).sum()
    }
}
