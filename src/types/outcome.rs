//! Outcome of a reading

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{TIMING_IMMINENT, TIMING_LATER, TIMING_SOON};

/// Coarse timing label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimingBucket {
    /// Within days
    Imminent,
    /// Within weeks
    Soon,
    /// Within months
    Later,
    /// Not in the foreseeable window
    Distant,
}

impl TimingBucket {
    pub fn from_probability(probability: u8) -> Self {
        if probability >= TIMING_IMMINENT {
            TimingBucket::Imminent
        } else if probability >= TIMING_SOON {
            TimingBucket::Soon
        } else if probability >= TIMING_LATER {
            TimingBucket::Later
        } else {
            TimingBucket::Distant
        }
    }

    /// ANSI-free label for parseable output
    pub fn label(&self) -> &'static str {
        match self {
            TimingBucket::Imminent => "IMMINENT",
            TimingBucket::Soon => "SOON",
            TimingBucket::Later => "LATER",
            TimingBucket::Distant => "DISTANT",
        }
    }
}

impl std::fmt::Display for TimingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorSource {
    Pattern,
    Subject,
}

/// One contribution to the outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub source: FactorSource,
    pub label: String,
    /// Points added to (or taken from) the probability
    pub weight: f64,
}

/// Final probability-weighted outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// 0-100
    pub probability: u8,
    pub timing: TimingBucket,
    /// Sum of pattern magnitudes before capping
    pub pattern_sum: i32,
    pub favorability: f64,
    pub factors: Vec<Factor>,
}

impl Outcome {
    /// Colored form for terminals
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "P={}% | {} | patterns {:+} | favorability {:.1}",
            self.probability, self.timing, self.pattern_sum, self.favorability
        );
        match self.timing {
            TimingBucket::Imminent => line.green().bold().to_string(),
            TimingBucket::Soon => line.green().to_string(),
            TimingBucket::Later => line.yellow().to_string(),
            TimingBucket::Distant => line.red().to_string(),
        }
    }

    /// Single-line form for logs and pipes
    pub fn to_parseable_string(&self) -> String {
        format!(
            "probability={} | timing={} | patterns={:+} | favorability={:.1}",
            self.probability,
            self.timing,
            self.pattern_sum,
            self.favorability
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
