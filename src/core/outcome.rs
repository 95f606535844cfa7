//! Outcome synthesizer: weighted sum and threshold lookup

use tracing::debug;

use crate::types::{EngineConfig, Factor, FactorSource, Outcome, PatternMatch, SubjectScores, TimingBucket};
use crate::{BASE_PROBABILITY, MAX_PATTERN_FACTORS, PATTERN_SUM_CAP};

/// Folds pattern matches and subject scores into one probability
#[derive(Debug, Clone, Copy)]
pub struct OutcomeSynthesizer {
    pattern_weight: f64,
    subject_weight: f64,
}

impl Default for OutcomeSynthesizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl OutcomeSynthesizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            pattern_weight: config.pattern_weight,
            subject_weight: config.subject_weight,
        }
    }

    /// `matches` are expected sorted, strongest first
    pub fn synthesize(&self, matches: &[PatternMatch], scores: &SubjectScores) -> Outcome {
        let pattern_sum: i32 = matches.iter().map(|m| m.magnitude as i32).sum();
        let capped = pattern_sum.clamp(-PATTERN_SUM_CAP, PATTERN_SUM_CAP);
        let subject_delta = scores.favorability - 50.0;

        let raw = BASE_PROBABILITY
            + self.pattern_weight * capped as f64
            + self.subject_weight * subject_delta;
        let probability = raw.clamp(0.0, 100.0).round() as u8;
        let timing = TimingBucket::from_probability(probability);

        let mut factors: Vec<Factor> = matches
            .iter()
            .take(MAX_PATTERN_FACTORS)
            .map(|m| Factor {
                source: FactorSource::Pattern,
                label: format!("{} @ {}", m.name, m.palace),
                weight: self.pattern_weight * m.magnitude as f64,
            })
            .collect();
        factors.extend(scores.scores.iter().map(|s| Factor {
            source: FactorSource::Subject,
            label: format!("{} ({})", s.subject, s.marker),
            weight: s.total as f64,
        }));

        debug!(pattern_sum, capped, probability, timing = %timing, "outcome synthesized");
        Outcome {
            probability,
            timing,
            pattern_sum,
            favorability: scores.favorability,
            factors,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
