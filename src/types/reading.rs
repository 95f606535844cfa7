//! Request and result of a full reading

use serde::{Deserialize, Serialize};

use crate::types::{
    Advisory, CalendarMoment, Cycle, FourPillars, Outcome, PatternMatch, Plate, Profile,
    SolarTermState, SubjectScores,
};

/// Everything the engine needs for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub moment: CalendarMoment,
    pub query: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl ReadingRequest {
    pub fn new(moment: CalendarMoment, query: impl Into<String>) -> Self {
        Self {
            moment,
            query: query.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Structured result handed to the report layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// SHA-256 of the request and config, for external memoization
    pub cache_key: String,
    pub moment: CalendarMoment,
    pub pillars: FourPillars,
    pub solar_term: SolarTermState,
    pub cycle: Cycle,
    pub plate: Plate,
    pub matches: Vec<PatternMatch>,
    pub subjects: SubjectScores,
    pub outcome: Outcome,
    pub advisories: Vec<Advisory>,
    /// Any advisory that lowers confidence in the plate itself
    pub degraded: bool,
}
