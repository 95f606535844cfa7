//! Query intent, subjects and their strength scores

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{LayerKind, Marker, Palace};

/// Query category picked from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    General,
    Career,
    Wealth,
    Relationship,
    Health,
    Study,
    Travel,
    Legal,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Intent::General => "general",
            Intent::Career => "career",
            Intent::Wealth => "wealth",
            Intent::Relationship => "relationship",
            Intent::Health => "health",
            Intent::Study => "study",
            Intent::Travel => "travel",
            Intent::Legal => "legal",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Optional details about the person asking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Option<Gender>,
    /// Secondary reference date, usually a birth date
    pub reference_date: Option<NaiveDate>,
}

/// A query concept resolved to a concrete marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub marker: Marker,
}

/// Seasonal standing of an element (wang, xiang, xiu, qiu, si)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalState {
    Dominant,
    Supportive,
    Neutral,
    Restrained,
    Exhausted,
}

/// Strength breakdown for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthScore {
    pub subject: String,
    pub marker: Marker,
    pub found: bool,
    pub layer: Option<LayerKind>,
    pub palace: Option<Palace>,
    pub seasonal_state: Option<SeasonalState>,
    pub seasonal: i32,
    pub palace_relation: i32,
    pub hour_relation: i32,
    pub total: i32,
}

impl StrengthScore {
    /// Zero score for a subject that is not on the plate
    pub fn not_found(subject: &Subject) -> Self {
        Self {
            subject: subject.name.clone(),
            marker: subject.marker,
            found: false,
            layer: None,
            palace: None,
            seasonal_state: None,
            seasonal: 0,
            palace_relation: 0,
            hour_relation: 0,
            total: 0,
        }
    }
}

/// All subject scores for a query plus the overall favorability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectScores {
    pub intent: Intent,
    /// In subject order
    pub scores: Vec<StrengthScore>,
    /// 0-100
    pub favorability: f64,
}

impl SubjectScores {
    pub fn get(&self, subject: &str) -> Option<&StrengthScore> {
        self.scores.iter().find(|s| s.subject == subject)
    }
}
