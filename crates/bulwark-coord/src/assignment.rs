//! Assignment ledger: which units are committed against which threat.
//!
//! Keyed by threat identity, so a threat can never carry two assignments.
//! Each entry keeps one share per contributing unit and a generation number
//! that in-flight interceptors carry, so a release only ever gives back a
//! share that interceptor was actually counted in. A `BTreeMap` keeps
//! iteration order stable across runs.

use std::collections::BTreeMap;

use bulwark_core::state::AssignmentView;
use bulwark_core::types::{ThreatId, UnitId};

/// One commitment against a threat.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Unit that made the most recent commitment.
    pub assigned_unit: UnitId,
    /// Interceptors attributed to the threat, per committing unit.
    pub shares: BTreeMap<UnitId, u32>,
    /// Sum of `shares`.
    pub interceptor_count: u32,
    /// Time the assignment was first created (seconds).
    pub assigned_at: f64,
    /// Distinguishes this entry from earlier ones for the same threat.
    pub generation: u64,
}

impl Assignment {
    pub fn share_of(&self, unit: UnitId) -> u32 {
        self.shares.get(&unit).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentLedger {
    entries: BTreeMap<ThreatId, Assignment>,
    next_generation: u64,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, threat: ThreatId) -> Option<&Assignment> {
        self.entries.get(&threat)
    }

    /// Interceptors attributed to a threat (0 when unassigned).
    pub fn count_for(&self, threat: ThreatId) -> u32 {
        self.entries
            .get(&threat)
            .map_or(0, |a| a.interceptor_count)
    }

    /// Create the assignment or add `added` interceptors to `unit`'s share.
    /// Returns the generation the interceptors are counted in, or `None`
    /// when nothing was added.
    /// `assigned_at` is kept from creation so the TTL bounds the whole commitment.
    pub fn record(&mut self, threat: ThreatId, unit: UnitId, added: u32, now: f64) -> Option<u64> {
        if added == 0 {
            return None;
        }
        let next_generation = &mut self.next_generation;
        let entry = self.entries.entry(threat).or_insert_with(|| {
            *next_generation += 1;
            Assignment {
                assigned_unit: unit,
                shares: BTreeMap::new(),
                interceptor_count: 0,
                assigned_at: now,
                generation: *next_generation,
            }
        });
        entry.assigned_unit = unit;
        *entry.shares.entry(unit).or_insert(0) += added;
        entry.interceptor_count += added;
        Some(entry.generation)
    }

    /// Give back one interceptor's share. Only applies when the entry is the
    /// generation the interceptor was counted in and `unit` still holds a
    /// share; the entry is removed at zero. Returns whether anything changed.
    pub fn release(&mut self, threat: ThreatId, unit: UnitId, generation: u64) -> bool {
        let Some(entry) = self.entries.get_mut(&threat) else {
            return false;
        };
        if entry.generation != generation {
            return false;
        }
        let Some(share) = entry.shares.get_mut(&unit) else {
            return false;
        };
        *share -= 1;
        if *share == 0 {
            entry.shares.remove(&unit);
        }
        entry.interceptor_count -= 1;
        if entry.interceptor_count == 0 {
            self.entries.remove(&threat);
        }
        true
    }

    pub fn clear(&mut self, threat: ThreatId) -> Option<Assignment> {
        self.entries.remove(&threat)
    }

    /// Drop `unit`'s share from every assignment, returning the threats it
    /// was committed against. Other units' shares are untouched.
    pub fn clear_unit(&mut self, unit: UnitId) -> Vec<ThreatId> {
        let mut freed = Vec::new();
        self.entries.retain(|threat, a| {
            let Some(share) = a.shares.remove(&unit) else {
                return true;
            };
            freed.push(*threat);
            a.interceptor_count -= share;
            if let Some((&last, _)) = a.shares.iter().next_back() {
                if a.assigned_unit == unit {
                    a.assigned_unit = last;
                }
            }
            a.interceptor_count > 0
        });
        freed
    }

    /// Number of assignments `unit` holds a share in.
    pub fn count_for_unit(&self, unit: UnitId) -> u32 {
        self.entries
            .values()
            .filter(|a| a.shares.contains_key(&unit))
            .count() as u32
    }

    /// Remove assignments older than `ttl`, returning `(threat, age)` for each.
    pub fn purge_stale(&mut self, now: f64, ttl: f64) -> Vec<(ThreatId, f64)> {
        let mut purged = Vec::new();
        self.entries.retain(|threat, a| {
            let age = now - a.assigned_at;
            if age > ttl {
                purged.push((*threat, age));
                false
            } else {
                true
            }
        });
        purged
    }

    pub fn threats(&self) -> impl Iterator<Item = ThreatId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn views(&self) -> Vec<AssignmentView> {
        self.entries
            .iter()
            .map(|(threat, a)| AssignmentView {
                threat: *threat,
                unit: a.assigned_unit,
                shares: a.shares.iter().map(|(u, n)| (*u, *n)).collect(),
                interceptor_count: a.interceptor_count,
                assigned_at: a.assigned_at,
            })
            .collect()
    }
}
