//! Strength evaluator: locate each subject, score it three ways, average
//!
//! Weights live in the tables below; the evaluator only looks them up.

use tracing::{debug, warn};

use crate::types::{
    Advisory, Element, Intent, LayerKind, Marker, Palace, PhaseRelation, Plate, ReasonCode,
    SeasonalState, SolarTerm, StrengthScore, Subject, SubjectScores,
};
use crate::{SCORE_MAX, SCORE_MIN};

/// Points for the subject's standing in the current season
pub const SEASONAL_WEIGHTS: [(SeasonalState, i32); 5] = [
    (SeasonalState::Dominant, 15),
    (SeasonalState::Supportive, 10),
    (SeasonalState::Neutral, 0),
    (SeasonalState::Restrained, -5),
    (SeasonalState::Exhausted, -10),
];

/// Points for the subject's relation to its palace
pub const PALACE_WEIGHTS: [(PhaseRelation, i32); 5] = [
    (PhaseRelation::Generates, 8),
    (PhaseRelation::GeneratedBy, 15),
    (PhaseRelation::Restrains, -5),
    (PhaseRelation::RestrainedBy, -15),
    (PhaseRelation::Same, 12),
];

/// Points for the subject's relation to the hour branch
pub const HOUR_WEIGHTS: [(PhaseRelation, i32); 5] = [
    (PhaseRelation::Generates, 8),
    (PhaseRelation::GeneratedBy, 12),
    (PhaseRelation::Restrains, -3),
    (PhaseRelation::RestrainedBy, -8),
    (PhaseRelation::Same, 10),
];

fn lookup<K: PartialEq + Copy>(table: &[(K, i32)], key: K) -> i32 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// First palace holding `marker`, Heaven before Ground, palaces 1-9
pub fn find_marker(plate: &Plate, marker: Marker) -> Option<(LayerKind, Palace)> {
    plate
        .heaven
        .find(marker)
        .map(|palace| (LayerKind::Heaven, palace))
        .or_else(|| plate.ground.find(marker).map(|palace| (LayerKind::Ground, palace)))
}

/// Standing of `element` while `season` rules
pub fn seasonal_state(season: Element, element: Element) -> SeasonalState {
    match season.relation_to(element) {
        PhaseRelation::Same => SeasonalState::Dominant,
        PhaseRelation::Generates => SeasonalState::Supportive,
        PhaseRelation::GeneratedBy => SeasonalState::Neutral,
        PhaseRelation::RestrainedBy => SeasonalState::Restrained,
        PhaseRelation::Restrains => SeasonalState::Exhausted,
    }
}

/// Map a mean total from [SCORE_MIN, SCORE_MAX] onto [0, 100]
pub fn normalize_favorability(mean_total: f64) -> f64 {
    let span = (SCORE_MAX - SCORE_MIN) as f64;
    ((mean_total - SCORE_MIN as f64) / span * 100.0).clamp(0.0, 100.0)
}

/// Scores subjects against one plate and solar term
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthEvaluator;

impl StrengthEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Score for one subject; zero and `found = false` when off the plate
    pub fn score(&self, subject: &Subject, plate: &Plate, term: SolarTerm) -> StrengthScore {
        let Some((layer, palace)) = find_marker(plate, subject.marker) else {
            return StrengthScore::not_found(subject);
        };

        let element = subject.marker.element();
        let state = seasonal_state(term.season_element(), element);
        let seasonal = lookup(&SEASONAL_WEIGHTS, state);
        let palace_relation = lookup(&PALACE_WEIGHTS, element.relation_to(palace.element()));
        let hour_relation = lookup(&HOUR_WEIGHTS, element.relation_to(plate.hour.branch.element()));

        StrengthScore {
            subject: subject.name.clone(),
            marker: subject.marker,
            found: true,
            layer: Some(layer),
            palace: Some(palace),
            seasonal_state: Some(state),
            seasonal,
            palace_relation,
            hour_relation,
            total: seasonal + palace_relation + hour_relation,
        }
    }

    /// Scores for every subject plus the normalized favorability
    pub fn evaluate(
        &self,
        intent: Intent,
        subjects: &[Subject],
        plate: &Plate,
        term: SolarTerm,
    ) -> (SubjectScores, Vec<Advisory>) {
        let mut advisories = Vec::new();
        let scores: Vec<StrengthScore> = subjects
            .iter()
            .map(|subject| {
                let score = self.score(subject, plate, term);
                if !score.found {
                    warn!(subject = %subject.name, marker = %subject.marker, "subject not on plate");
                    advisories.push(Advisory::new(
                        ReasonCode::R301_SUBJECT_NOT_FOUND,
                        format!("{} ({})", subject.name, subject.marker),
                    ));
                }
                score
            })
            .collect();

        let favorability = if scores.is_empty() {
            50.0
        } else {
            let mean = scores.iter().map(|s| s.total as f64).sum::<f64>() / scores.len() as f64;
            normalize_favorability(mean)
        };

        debug!(intent = %intent, subjects = scores.len(), favorability, "subjects scored");
        (
            SubjectScores {
                intent,
                scores,
                favorability,
            },
            advisories,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
