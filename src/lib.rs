//! Qimen: a Qimen Dunjia plate engine
//!
//! Pipeline: moment → pillars + solar term → cycle → plate → patterns + subject
//! strength → outcome. Pure and synchronous; tables are immutable after startup.

pub mod core;
pub mod types;

// =============================================================================
// CALENDAR RANGE [C] - where the low-order solar series stays accurate
// =============================================================================

/// Earliest civil year accepted
pub const MIN_YEAR: i32 = 1900;

/// Latest civil year accepted
pub const MAX_YEAR: i32 = 2100;

/// Civil input times default to China Standard Time
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = 8.0;

/// Largest UTC offset a config may set
pub const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

// =============================================================================
// SOLAR-TERM SOLVER [C]
// =============================================================================

/// Stop refining once the angular error is below this (degrees)
pub const SOLVER_TOLERANCE_DEG: f64 = 1e-4;

/// Hard cap on refinement steps
pub const SOLVER_MAX_ITERATIONS: u8 = 10;

/// Mean apparent motion of the sun (degrees/day)
pub const MEAN_SOLAR_RATE: f64 = 0.985_647_36;

/// Eccentricity of the earth's orbit at J2000
pub const ORBIT_ECCENTRICITY: f64 = 0.016_708_634;

/// Mean tropical year (days)
pub const TROPICAL_YEAR_DAYS: f64 = 365.242_19;

/// Mean March equinox of 2000 (JD)
pub const MEAN_EQUINOX_J2000: f64 = 2_451_623.809_84;

// =============================================================================
// SCORING [C]
// =============================================================================

/// Lowest possible subject total (exhausted, restrained-by palace and hour)
pub const SCORE_MIN: i32 = -33;

/// Highest possible subject total (dominant, generated-by palace and hour)
pub const SCORE_MAX: i32 = 42;

/// Largest rule magnitude, either sign
pub const MAX_RULE_MAGNITUDE: i8 = 25;

/// Pattern magnitudes are summed then capped at ± this
pub const PATTERN_SUM_CAP: i32 = 50;

/// Probability with no patterns and neutral subjects
pub const BASE_PROBABILITY: f64 = 50.0;

pub const DEFAULT_PATTERN_WEIGHT: f64 = 0.6;
pub const DEFAULT_SUBJECT_WEIGHT: f64 = 0.8;

/// Patterns listed as outcome factors
pub const MAX_PATTERN_FACTORS: usize = 5;

// =============================================================================
// TIMING THRESHOLDS [C]
// =============================================================================

pub const TIMING_IMMINENT: u8 = 80;
pub const TIMING_SOON: u8 = 60;
pub const TIMING_LATER: u8 = 40;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
