//! Coordination constants and tuning parameters.
//!
//! Policy values here are the defaults of [`crate::config::CoordinationConfig`].

/// Simulation tick rate (Hz) used by the reference driver.
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Assignment ledger ---

/// Age after which an assignment is treated as abandoned (seconds).
pub const ASSIGNMENT_TTL_SECS: f64 = 30.0;

/// Interval between stale-state sweeps (seconds).
pub const SWEEP_INTERVAL_SECS: f64 = 1.0;

/// Age after which an in-flight interceptor is safed by the sweep (seconds).
pub const INTERCEPTOR_TTL_SECS: f64 = 30.0;

// --- Allocation ---

/// Interceptors wanted against an ordinary threat.
pub const ORDINARY_DESIRED_COUNT: u32 = 1;

/// Interceptors wanted against a high-value threat.
pub const HIGH_VALUE_DESIRED_COUNT: u32 = 2;

/// Global cap on simultaneously in-flight interceptors.
pub const MAX_IN_FLIGHT: usize = 32;

/// Maximum new commitments made in a single tick.
pub const MAX_COMMITS_PER_TICK: usize = 8;

/// Magazine rounds per concurrent engagement channel.
pub const ROUNDS_PER_CHANNEL: u32 = 4;

/// Floor of the load factor so a saturated unit is discouraged, not excluded.
pub const LOAD_FACTOR_FLOOR: f64 = 0.1;

/// Window after a launch during which a unit's score is penalised (seconds).
pub const RECENCY_WINDOW_SECS: f64 = 0.2;

/// Multiplier applied inside the recency window.
pub const RECENCY_PENALTY: f64 = 0.9;

/// Self-defense tiers: (max distance from impact point to unit, multiplier).
pub const SELF_DEFENSE_TIERS: [(f64, f64); 3] = [(50.0, 3.0), (100.0, 2.0), (200.0, 1.5)];

// --- Repurposing ---

/// Maximum distance from an orphaned interceptor to a substitute target.
pub const RETARGET_REACH: f64 = 50.0;

/// A substitute target already carrying this many interceptors is rejected.
pub const RETARGET_CAP: usize = 3;

/// Lower bound on time-to-impact in the retarget score (seconds).
pub const RETARGET_MIN_TTI_SECS: f64 = 1.0;

// --- Reference driver: world ---

/// Radius beyond which entities are despawned (meters).
pub const WORLD_RADIUS: f64 = 5_000.0;

/// Distance at which an interceptor detonates on its target (meters).
pub const INTERCEPT_LETHAL_RADIUS: f64 = 5.0;

/// Distance from the defended point at which a threat impacts (meters).
pub const THREAT_IMPACT_RANGE: f64 = 5.0;

/// Proximity quality below which a detonation cannot kill.
pub const MIN_KILL_QUALITY: f64 = 0.2;

/// Interceptor fuel as a multiple of its time to fly max range.
pub const INTERCEPTOR_FUEL_MARGIN: f64 = 1.5;

// --- Reference driver: threats ---

/// Rocket speed (m/s).
pub const ROCKET_SPEED: f64 = 60.0;

/// Cruise missile speed (m/s).
pub const CRUISE_MISSILE_SPEED: f64 = 90.0;

/// Heavy (high-value) warhead speed (m/s).
pub const HEAVY_WARHEAD_SPEED: f64 = 45.0;

/// Threats spawn on a ring between these ranges from the origin (meters).
pub const THREAT_SPAWN_RANGE_MIN: f64 = 1_800.0;
pub const THREAT_SPAWN_RANGE_MAX: f64 = 2_200.0;

/// Maximum offset of a threat's aim point from the defended origin (meters).
pub const TARGET_SCATTER: f64 = 150.0;

/// Range to its target at which a heavy warhead breaks up (meters).
pub const FRAGMENT_RANGE: f64 = 700.0;

/// Rockets released when a heavy warhead breaks up.
pub const FRAGMENT_COUNT: u32 = 3;

/// Spread of fragment aim points around the parent's aim point (meters).
pub const FRAGMENT_SCATTER: f64 = 80.0;

// --- Reference driver: units ---

/// Missile battery magazine size.
pub const BATTERY_MAGAZINE: u32 = 16;

/// Missile battery max engagement range (meters).
pub const BATTERY_MAX_RANGE: f64 = 1_200.0;

/// Missile battery min engagement range (meters).
pub const BATTERY_MIN_RANGE: f64 = 20.0;

/// Missile battery interceptor speed (m/s).
pub const BATTERY_PROJECTILE_SPEED: f64 = 250.0;

/// Missile battery reload time per round (seconds).
pub const BATTERY_RELOAD_SECS: f64 = 4.0;

/// Missile battery base probability of kill.
pub const BATTERY_BASE_PK: f64 = 0.75;

/// Energy emitter capacitor size (energy units).
pub const EMITTER_CAPACITY: f64 = 100.0;

/// Energy spent per emitter shot.
pub const EMITTER_SHOT_COST: f64 = 12.5;

/// Emitter recharge rate (energy units per second).
pub const EMITTER_RECHARGE_RATE: f64 = 5.0;

/// Emitter max engagement range (meters).
pub const EMITTER_MAX_RANGE: f64 = 400.0;

/// Emitter projectile speed (m/s).
pub const EMITTER_PROJECTILE_SPEED: f64 = 400.0;

/// Emitter base probability of kill.
pub const EMITTER_BASE_PK: f64 = 0.6;
