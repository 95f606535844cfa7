//! Pattern rules and the matches they produce

use serde::{Deserialize, Serialize};

use crate::types::{Displacement, Door, Guardian, Palace, PhaseRelation, Star, Stem};

/// Whether a pattern helps or hinders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Auspicious,
    Inauspicious,
}

/// Condition a rule tests against one palace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RulePredicate {
    /// Heaven stem sits over ground stem
    StemOverStem { heaven: Stem, ground: Stem },
    /// Heaven stem shares its palace with a door
    StemWithDoor { stem: Stem, door: Door },
    /// Heaven stem shares its palace with a guardian
    StemWithGuardian { stem: Stem, guardian: Guardian },
    /// Heaven stem shares its palace with a star
    StemWithStar { stem: Stem, star: Star },
    /// Door shares its palace with a star
    DoorWithStar { door: Door, star: Star },
    /// Heaven stem lands in a given palace
    StemInPalace { stem: Stem, palace: Palace },
    /// Door lands in a given palace
    DoorInPalace { door: Door, palace: Palace },
    /// Door element relates to its palace element in a given way
    DoorAgainstPalace { relation: PhaseRelation },
    /// Outer ring as a whole moved this way; tested once, at the hour palace
    Displacement { class: Displacement },
}

/// A named combination with a fixed weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRule {
    pub id: u16,
    pub name: &'static str,
    pub predicate: RulePredicate,
    pub polarity: Polarity,
    /// Signed weight in [-25, 25]
    pub magnitude: i8,
}

/// A rule that fired at a palace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub rule_id: u16,
    pub name: String,
    pub palace: Palace,
    pub polarity: Polarity,
    pub magnitude: i8,
}

impl PatternMatch {
    pub fn from_rule(rule: &PatternRule, palace: Palace) -> Self {
        Self {
            rule_id: rule.id,
            name: rule.name.to_string(),
            palace,
            polarity: rule.polarity,
            magnitude: rule.magnitude,
        }
    }
}
