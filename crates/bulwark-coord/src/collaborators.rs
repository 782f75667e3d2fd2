//! Contracts the core consumes from its external collaborators.

use bulwark_core::enums::{AmmoModel, ThreatClass};
use bulwark_core::error::RegistrationError;
use bulwark_core::types::{InterceptorId, Position, ThreatId, UnitId, Velocity};
use serde::{Deserialize, Serialize};

use crate::claim::InterceptClaim;

/// An incoming threat owned by the external threat pool.
///
/// The core reads kinematics once per tick and only ever toggles the claim.
pub trait Threat {
    fn id(&self) -> ThreatId;
    fn position(&self) -> Position;
    fn velocity(&self) -> Velocity;
    /// Seconds until impact. Non-positive means the threat can no longer be engaged.
    fn time_to_impact(&self) -> f64;
    /// Precomputed impact point, if the pool knows it.
    fn impact_point(&self) -> Option<Position>;
    fn is_active(&self) -> bool;
    fn class(&self) -> ThreatClass;
    fn claim(&self) -> &InterceptClaim;

    /// Atomic claim; true only if the threat was not already claimed.
    fn mark_as_being_intercepted(&self) -> bool {
        self.claim().try_claim()
    }

    fn unmark_as_being_intercepted(&self) {
        self.claim().release()
    }

    fn is_being_intercepted(&self) -> bool {
        self.claim().is_claimed()
    }
}

/// Static capability envelope of a defending unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityEnvelope {
    pub min_range: f64,
    pub max_range: f64,
    pub projectile_speed: f64,
    /// Full-load shot count (rounds, or energy capacity divided by shot cost).
    pub magazine_size: u32,
    pub reload_secs: f64,
    /// Base probability that one interceptor kills its target.
    pub base_success_probability: f64,
}

impl CapabilityEnvelope {
    /// Reject envelopes that would divide by zero or invert range checks.
    pub fn validate(&self, unit: UnitId) -> Result<(), RegistrationError> {
        if self.magazine_size == 0 {
            return Err(RegistrationError::NonPositiveMagazine { unit });
        }
        if !(self.min_range >= 0.0 && self.max_range > 0.0 && self.min_range <= self.max_range) {
            return Err(RegistrationError::InvalidRange {
                unit,
                min_range: self.min_range,
                max_range: self.max_range,
            });
        }
        if !(self.projectile_speed > 0.0) {
            return Err(RegistrationError::NonPositiveProjectileSpeed {
                unit,
                speed: self.projectile_speed,
            });
        }
        if !(0.0..=1.0).contains(&self.base_success_probability) {
            return Err(RegistrationError::InvalidSuccessProbability {
                unit,
                probability: self.base_success_probability,
            });
        }
        Ok(())
    }

    /// Whether `distance` lies inside the engagement envelope.
    pub fn covers(&self, distance: f64) -> bool {
        distance >= self.min_range && distance <= self.max_range
    }
}

/// A one-shot fire order issued by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct FireRequest {
    pub threat: ThreatId,
    /// Interceptors wanted; the unit may launch fewer.
    pub count: u32,
    pub aim_point: Position,
    pub flight_time_secs: f64,
    pub now: f64,
}

/// A defending unit, magazine- or energy-fed, seen through one capability set.
pub trait DefendingUnit {
    fn id(&self) -> UnitId;
    fn position(&self) -> Position;
    fn is_operational(&self) -> bool;
    fn envelope(&self) -> CapabilityEnvelope;
    /// Shots the unit could launch right now.
    fn available_ammo(&self) -> u32;
    fn last_fired_at(&self) -> Option<f64>;

    fn ammo_model(&self) -> AmmoModel {
        AmmoModel::Magazine
    }

    /// Launch up to `request.count` interceptors, calling `on_created` once per
    /// interceptor actually launched. Returns the number launched. This is the
    /// only path by which the core mutates a unit.
    fn fire(&mut self, request: &FireRequest, on_created: &mut dyn FnMut(InterceptorId)) -> u32;
}

impl<U: DefendingUnit + ?Sized> DefendingUnit for Box<U> {
    fn id(&self) -> UnitId {
        (**self).id()
    }
    fn position(&self) -> Position {
        (**self).position()
    }
    fn is_operational(&self) -> bool {
        (**self).is_operational()
    }
    fn envelope(&self) -> CapabilityEnvelope {
        (**self).envelope()
    }
    fn available_ammo(&self) -> u32 {
        (**self).available_ammo()
    }
    fn last_fired_at(&self) -> Option<f64> {
        (**self).last_fired_at()
    }
    fn ammo_model(&self) -> AmmoModel {
        (**self).ammo_model()
    }
    fn fire(&mut self, request: &FireRequest, on_created: &mut dyn FnMut(InterceptorId)) -> u32 {
        (**self).fire(request, on_created)
    }
}

/// Where and when a projectile meets a moving target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptSolution {
    pub point: Position,
    pub time_secs: f64,
}

/// Pure intercept geometry.
pub trait TrajectoryService {
    /// `None` when the projectile can never catch the target.
    fn intercept(
        &self,
        origin: &Position,
        target_pos: &Position,
        target_vel: &Velocity,
        projectile_speed: f64,
    ) -> Option<InterceptSolution>;
}

/// A proximity/contact condition reported by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    pub interceptor: InterceptorId,
    pub position: Position,
    /// Geometric quality of the detonation in [0, 1].
    pub quality: f64,
    /// Hit signal from the external damage model.
    pub hit: bool,
    /// Kill-probability estimate the damage model used.
    pub kill_probability: f64,
}
