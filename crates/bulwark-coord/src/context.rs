//! Coordination context: the per-session owner of all coordinator state.
//!
//! The driver constructs one `CoordinationContext` per match, feeds it
//! detonations and removals as physics reports them, and calls [`tick`] once
//! per simulation step with the current threats and units. Tick order:
//! unit refresh → stale sweep (when due) → resolution → repurposing →
//! allocation.
//!
//! [`tick`]: CoordinationContext::tick

use std::collections::{BTreeMap, BTreeSet};

use bulwark_core::config::CoordinationConfig;
use bulwark_core::enums::AllocationMode;
use bulwark_core::error::RegistrationError;
use bulwark_core::events::{CoordinationEvent, TickReport};
use bulwark_core::state::{AssignmentView, CoordinationStats};
use bulwark_core::types::{InterceptorId, Position, ThreatId, UnitId};
use tracing::{debug, info};

use crate::assignment::{Assignment, AssignmentLedger};
use crate::collaborators::{DefendingUnit, Detonation, Threat, TrajectoryService};
use crate::interceptor::{InFlightInterceptor, InterceptorRegistry};
use crate::trajectory::LeadSolver;
use crate::unit_ledger::{UnitLedger, UnitStatus};
use crate::{optimizer, repurpose, resolution, sweep};

pub struct CoordinationContext<S = LeadSolver> {
    config: CoordinationConfig,
    solver: S,
    units: UnitLedger,
    assignments: AssignmentLedger,
    interceptors: InterceptorRegistry,
    pending_detonations: Vec<Detonation>,
    pending_removals: BTreeSet<ThreatId>,
    /// Threats killed by a resolution but still reported active by the pool.
    destroyed: BTreeSet<ThreatId>,
    last_sweep_at: Option<f64>,
    counters: CoordinationStats,
    events: Vec<CoordinationEvent>,
}

impl CoordinationContext<LeadSolver> {
    /// Create a context using the built-in lead-pursuit solver.
    pub fn new(config: CoordinationConfig) -> Self {
        Self::with_solver(config, LeadSolver)
    }
}

impl Default for CoordinationContext<LeadSolver> {
    fn default() -> Self {
        Self::new(CoordinationConfig::default())
    }
}

impl<S: TrajectoryService> CoordinationContext<S> {
    pub fn with_solver(config: CoordinationConfig, solver: S) -> Self {
        Self {
            config,
            solver,
            units: UnitLedger::new(),
            assignments: AssignmentLedger::new(),
            interceptors: InterceptorRegistry::new(),
            pending_detonations: Vec::new(),
            pending_removals: BTreeSet::new(),
            destroyed: BTreeSet::new(),
            last_sweep_at: None,
            counters: CoordinationStats::default(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    /// Toggle scored allocation. When disabled the optimizer falls back to
    /// the nearest capable unit.
    pub fn set_coordination_enabled(&mut self, enabled: bool) {
        if self.config.coordination_enabled != enabled {
            info!(enabled, "coordination mode changed");
        }
        self.config.coordination_enabled = enabled;
    }

    pub fn allocation_mode(&self) -> AllocationMode {
        if self.config.coordination_enabled {
            AllocationMode::Scored
        } else {
            AllocationMode::NearestCapable
        }
    }

    // --- Unit registry ---

    /// Start coordinating a unit. Fails fast on envelopes that would corrupt scoring.
    pub fn register_unit<U: DefendingUnit + ?Sized>(
        &mut self,
        unit: &U,
    ) -> Result<(), RegistrationError> {
        self.units.register(unit)
    }

    /// Stop coordinating a unit and drop its share of every assignment.
    /// Its interceptors already in flight keep flying but no longer count
    /// toward any assignment. Returns false if the unit was not registered.
    pub fn unregister_unit(&mut self, id: UnitId) -> bool {
        if self.units.unregister(id).is_none() {
            return false;
        }
        let freed = self.assignments.clear_unit(id);
        debug!(unit = %id, freed = freed.len(), "unregistered unit");
        true
    }

    // --- Physics reports ---

    /// Queue a proximity/contact report for resolution on the next tick.
    pub fn report_detonation(&mut self, detonation: Detonation) {
        self.pending_detonations.push(detonation);
    }

    /// Queue notice that a threat left the pool by any path (fragmentation,
    /// impact, despawn). Its interceptors are repurposed on the next tick.
    pub fn notify_threat_removed(&mut self, threat: ThreatId) {
        self.pending_removals.insert(threat);
    }

    /// Record the latest physics position of an interceptor.
    pub fn report_interceptor_position(&mut self, id: InterceptorId, position: Position) {
        if let Some(interceptor) = self.interceptors.get_mut(id) {
            interceptor.last_known_position = Some(position);
        }
    }

    /// An interceptor ceased to exist without detonating (fuel, bounds).
    /// Frees its share of the target's assignment immediately, if it still has one.
    pub fn report_interceptor_lost(&mut self, id: InterceptorId) -> bool {
        match self.interceptors.remove(id) {
            Some(interceptor) => {
                self.assignments
                    .release(interceptor.target, interceptor.unit, interceptor.assignment);
                debug!(interceptor = %id, target = %interceptor.target, "interceptor lost");
                true
            }
            None => false,
        }
    }

    // --- Tick ---

    /// Advance the coordinator to `now` (seconds).
    pub fn tick<T, U>(&mut self, now: f64, threats: &[T], units: &mut [U]) -> TickReport
    where
        T: Threat,
        U: DefendingUnit,
    {
        // 1. Shadow refresh.
        self.units.refresh(units, &self.assignments);

        let pool: BTreeMap<ThreatId, &T> = threats.iter().map(|t| (t.id(), t)).collect();
        self.destroyed
            .retain(|id| pool.get(id).is_some_and(|t| t.is_active()));

        // 2. Stale sweep at reduced frequency.
        let sweep_due = self
            .last_sweep_at
            .map_or(true, |last| now - last >= self.config.sweep_interval_secs);
        if sweep_due {
            self.run_sweep_with(now, &pool);
        }

        // 3. Resolution of reported detonations, in arrival order.
        let detonations = std::mem::take(&mut self.pending_detonations);
        let killed = resolution::run(
            detonations,
            &pool,
            &mut self.assignments,
            &mut self.interceptors,
            &mut self.destroyed,
            &mut self.events,
            &mut self.counters,
        );

        // 4. Repurposing for every removal path.
        let mut removed = std::mem::take(&mut self.pending_removals);
        removed.extend(killed);
        removed.extend(self.vanished_targets(&pool));
        if !removed.is_empty() {
            let mut dead = removed.clone();
            dead.extend(self.destroyed.iter().copied());
            repurpose::run(
                &removed,
                &dead,
                &pool,
                &mut self.assignments,
                &mut self.interceptors,
                &self.config,
                now,
                &mut self.events,
                &mut self.counters,
            );
        }

        // 5. Allocation over what remains.
        optimizer::run(
            threats,
            units,
            &mut self.units,
            &mut self.assignments,
            &mut self.interceptors,
            &self.destroyed,
            &self.solver,
            &self.config,
            now,
            &mut self.events,
            &mut self.counters,
        );

        TickReport {
            now,
            events: std::mem::take(&mut self.events),
        }
    }

    /// Run the stale-state sweep immediately, outside the regular cadence.
    pub fn run_sweep<T: Threat>(&mut self, now: f64, threats: &[T]) -> Vec<CoordinationEvent> {
        let pool: BTreeMap<ThreatId, &T> = threats.iter().map(|t| (t.id(), t)).collect();
        self.run_sweep_with(now, &pool);
        std::mem::take(&mut self.events)
    }

    fn run_sweep_with<T: Threat>(&mut self, now: f64, pool: &BTreeMap<ThreatId, &T>) {
        sweep::run(
            pool,
            &self.destroyed,
            &mut self.assignments,
            &mut self.interceptors,
            &self.config,
            now,
            &mut self.events,
            &mut self.counters,
        );
        self.last_sweep_at = Some(now);
    }

    /// Threats referenced by an interceptor or assignment that are no longer
    /// active in the pool (or missing from it entirely).
    fn vanished_targets<T: Threat>(&self, pool: &BTreeMap<ThreatId, &T>) -> BTreeSet<ThreatId> {
        self.interceptors
            .iter()
            .map(|i| i.target)
            .chain(self.assignments.threats())
            .filter(|id| !pool.get(id).is_some_and(|t| t.is_active()))
            .collect()
    }

    // --- Queries ---

    pub fn stats(&self) -> CoordinationStats {
        CoordinationStats {
            active_assignments: self.assignments.len(),
            total_active_engagements: self.units.total_active_engagements(),
            unit_count: self.units.len(),
            in_flight: self.interceptors.len(),
            ..self.counters.clone()
        }
    }

    pub fn assignment(&self, threat: ThreatId) -> Option<&Assignment> {
        self.assignments.get(threat)
    }

    pub fn assignments(&self) -> Vec<AssignmentView> {
        self.assignments.views()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &InFlightInterceptor> {
        self.interceptors.iter()
    }

    pub fn interceptor(&self, id: InterceptorId) -> Option<&InFlightInterceptor> {
        self.interceptors.get(id)
    }

    pub fn unit_status(&self, id: UnitId) -> Option<&UnitStatus> {
        self.units.get(id)
    }
}
