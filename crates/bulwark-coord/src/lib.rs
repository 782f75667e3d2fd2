//! Engagement coordination core for BULWARK.
//!
//! Decides each tick which defending unit commits interceptors against which
//! threat, tracks in-flight interceptors, resolves reported detonations, and
//! repurposes interceptors whose target disappears. Threats, units and the
//! trajectory solver are external collaborators reached through the traits in
//! [`collaborators`]; the core holds no global state.

pub mod assignment;
pub mod claim;
pub mod collaborators;
pub mod context;
pub mod interceptor;
pub mod optimizer;
pub mod repurpose;
pub mod resolution;
pub mod scoring;
pub mod sweep;
pub mod trajectory;
pub mod unit_ledger;

pub use bulwark_core as core;
pub use claim::InterceptClaim;
pub use collaborators::{
    CapabilityEnvelope, DefendingUnit, Detonation, FireRequest, InterceptSolution, Threat,
    TrajectoryService,
};
pub use context::CoordinationContext;
pub use trajectory::LeadSolver;
