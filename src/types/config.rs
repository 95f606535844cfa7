//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{EngineError, EngineResult};
use crate::{
    DEFAULT_PATTERN_WEIGHT, DEFAULT_SUBJECT_WEIGHT, DEFAULT_UTC_OFFSET_HOURS, MAX_UTC_OFFSET_HOURS,
};

/// Tunables read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Offset of civil input times from UTC
    pub utc_offset_hours: f64,
    /// Shift day/hour pillars to local mean solar time when a longitude is given
    pub solar_time: bool,
    /// Probability points per unit of pattern magnitude
    pub pattern_weight: f64,
    /// Probability points per point of favorability above 50
    pub subject_weight: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            solar_time: true,
            pattern_weight: DEFAULT_PATTERN_WEIGHT,
            subject_weight: DEFAULT_SUBJECT_WEIGHT,
        }
    }
}

impl EngineConfig {
    /// Reject values that would make the pipeline meaningless
    pub fn validate(&self) -> EngineResult<()> {
        if !self.utc_offset_hours.is_finite()
            || self.utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS
        {
            return Err(EngineError::Config(format!(
                "utc_offset_hours {} outside ±{}",
                self.utc_offset_hours, MAX_UTC_OFFSET_HOURS
            )));
        }
        for (name, value) in [
            ("pattern_weight", self.pattern_weight),
            ("subject_weight", self.subject_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Meridian of the civil time zone in degrees east
    pub fn zone_meridian(&self) -> f64 {
        self.utc_offset_hours * 15.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
