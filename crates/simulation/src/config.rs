use std::time::Duration;

/// Edges touching a hazardous node cost this many times their base weight.
pub const HAZARD_WEIGHT_MULTIPLIER: u64 = 100;

/// Intensity of a hazard placed explicitly by an operator.
pub const INITIAL_HAZARD_INTENSITY: f64 = 1.0;
/// Each spread step multiplies the parent intensity by this factor.
pub const SPREAD_INTENSITY_DECAY: f64 = 0.8;
/// Per-neighbor spread probability at intensity 1.0 and maximum speed.
pub const SPREAD_BASE_CHANCE: f64 = 0.03;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
pub const DEFAULT_SPEED: u8 = 5;

/// Tick interval at speed 1. Speed `n` ticks every `BASE_TICK_INTERVAL / n`.
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(2000);

/// Walking-time heuristic shown alongside a route.
pub const WALK_MINUTES_PER_NODE: u32 = 2;

/// More hazards than this raise the threat level to `Warning`.
pub const THREAT_WARNING_ABOVE: usize = 2;
/// More hazards than this raise the threat level to `Critical`.
pub const THREAT_CRITICAL_ABOVE: usize = 5;

/// Maximum number of command results retained by `CommandLog`.
pub const COMMAND_LOG_CAPACITY: usize = 64;

/// Seed used when no explicit seed is provided.
pub const DEFAULT_RNG_SEED: u64 = 42;
