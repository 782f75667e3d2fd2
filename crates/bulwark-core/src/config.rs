//! Coordination policy configuration.
//!
//! Every field defaults to the matching constant in [`crate::constants`], so a
//! partial JSON document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ThreatClass;
use crate::error::ConfigError;

/// Tunable policy inputs for one coordination session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Global cap on simultaneously in-flight interceptors.
    pub max_in_flight: usize,
    /// Maximum new commitments per tick.
    pub max_commits_per_tick: usize,
    /// Assignment time-to-live (seconds).
    pub assignment_ttl_secs: f64,
    /// In-flight interceptor time-to-live (seconds).
    pub interceptor_ttl_secs: f64,
    /// Interval between stale-state sweeps (seconds).
    pub sweep_interval_secs: f64,
    /// Recency penalty window (seconds).
    pub recency_window_secs: f64,
    /// Interceptors wanted against an ordinary threat.
    pub ordinary_desired_count: u32,
    /// Interceptors wanted against a high-value threat.
    pub high_value_desired_count: u32,
    /// Maximum retarget distance for orphaned interceptors.
    pub retarget_reach: f64,
    /// Interceptor count at which a substitute target is rejected.
    pub retarget_cap: usize,
    /// When false, the optimizer uses the nearest-capable-unit rule.
    pub coordination_enabled: bool,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            max_in_flight: MAX_IN_FLIGHT,
            max_commits_per_tick: MAX_COMMITS_PER_TICK,
            assignment_ttl_secs: ASSIGNMENT_TTL_SECS,
            interceptor_ttl_secs: INTERCEPTOR_TTL_SECS,
            sweep_interval_secs: SWEEP_INTERVAL_SECS,
            recency_window_secs: RECENCY_WINDOW_SECS,
            ordinary_desired_count: ORDINARY_DESIRED_COUNT,
            high_value_desired_count: HIGH_VALUE_DESIRED_COUNT,
            retarget_reach: RETARGET_REACH,
            retarget_cap: RETARGET_CAP,
            coordination_enabled: true,
        }
    }
}

impl CoordinationConfig {
    /// Parse and validate a JSON policy document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CoordinationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or destabilise allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight == 0 {
            return Err(invalid("max_in_flight", "must be at least 1"));
        }
        if self.max_commits_per_tick == 0 {
            return Err(invalid("max_commits_per_tick", "must be at least 1"));
        }
        if !(self.assignment_ttl_secs > 0.0) {
            return Err(invalid("assignment_ttl_secs", "must be positive"));
        }
        if !(self.interceptor_ttl_secs > 0.0) {
            return Err(invalid("interceptor_ttl_secs", "must be positive"));
        }
        if !(self.sweep_interval_secs >= 0.0) {
            return Err(invalid("sweep_interval_secs", "must be non-negative"));
        }
        if !(self.recency_window_secs >= 0.0) {
            return Err(invalid("recency_window_secs", "must be non-negative"));
        }
        if self.ordinary_desired_count == 0 {
            return Err(invalid("ordinary_desired_count", "must be at least 1"));
        }
        if self.high_value_desired_count < self.ordinary_desired_count {
            return Err(invalid(
                "high_value_desired_count",
                "must not be below ordinary_desired_count",
            ));
        }
        if !(self.retarget_reach > 0.0) {
            return Err(invalid("retarget_reach", "must be positive"));
        }
        Ok(())
    }

    /// Policy-determined interceptor count for a threat class.
    pub fn desired_count(&self, class: ThreatClass) -> u32 {
        match class {
            ThreatClass::Ordinary => self.ordinary_desired_count,
            ThreatClass::HighValue => self.high_value_desired_count,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
