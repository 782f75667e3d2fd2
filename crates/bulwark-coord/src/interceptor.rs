//! In-flight interceptor list.

use bulwark_core::types::{InterceptorId, Position, ThreatId, UnitId};

/// An interceptor launched by the core and not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InFlightInterceptor {
    pub id: InterceptorId,
    pub unit: UnitId,
    /// Current target; changes under repurposing.
    pub target: ThreatId,
    /// Generation of the target's assignment this interceptor is counted in.
    pub assignment: u64,
    pub launched_at: f64,
    pub origin: Position,
    pub aim_point: Position,
    pub speed: f64,
    /// Latest position reported by the physics driver.
    pub last_known_position: Option<Position>,
}

impl InFlightInterceptor {
    /// Reported position, or a straight-line estimate toward the aim point.
    pub fn position_at(&self, now: f64) -> Position {
        if let Some(pos) = self.last_known_position {
            return pos;
        }
        let total = self.origin.range_to(&self.aim_point);
        if total < 1e-9 {
            return self.aim_point;
        }
        let travelled = (self.speed * (now - self.launched_at).max(0.0)).min(total);
        let dir = (self.aim_point.as_dvec3() - self.origin.as_dvec3()) / total;
        Position::from(self.origin.as_dvec3() + dir * travelled)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterceptorRegistry {
    list: Vec<InFlightInterceptor>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interceptor: InFlightInterceptor) {
        self.list.push(interceptor);
    }

    pub fn remove(&mut self, id: InterceptorId) -> Option<InFlightInterceptor> {
        let idx = self.list.iter().position(|i| i.id == id)?;
        Some(self.list.remove(idx))
    }

    pub fn get(&self, id: InterceptorId) -> Option<&InFlightInterceptor> {
        self.list.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: InterceptorId) -> Option<&mut InFlightInterceptor> {
        self.list.iter_mut().find(|i| i.id == id)
    }

    /// Interceptors currently pointed at `threat`.
    pub fn referencing(&self, threat: ThreatId) -> usize {
        self.list.iter().filter(|i| i.target == threat).count()
    }

    /// Ids of interceptors pointed at `threat`, in launch order.
    pub fn targeting(&self, threat: ThreatId) -> Vec<InterceptorId> {
        self.list
            .iter()
            .filter(|i| i.target == threat)
            .map(|i| i.id)
            .collect()
    }

    /// Ids of interceptors launched more than `ttl` seconds ago.
    pub fn expired(&self, now: f64, ttl: f64) -> Vec<InterceptorId> {
        self.list
            .iter()
            .filter(|i| now - i.launched_at > ttl)
            .map(|i| i.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InFlightInterceptor> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
