//! Intent classifier and subject registry
//!
//! Keyword categories are checked in a fixed order and the first hit wins.
//! Each intent maps to a fixed list of subjects; every subject is a tagged
//! marker so the strength evaluator can look it up with one generic search.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::types::{
    Door, FourPillars, Gender, Guardian, Intent, Marker, Profile, SexagenaryLabel, Star, Stem,
    Subject,
};

lazy_static! {
    // =========================================================================
    // Career: job, promotion, business dealings
    // =========================================================================
    static ref RE_CAREER: Regex = Regex::new(
        r"(?i)\b(career|job|jobs|work|promotion|promoted|boss|interview|hire|hired|hiring|employer|employment|position|business|opportunity|opportunities|office|project)\b|工作|事业|升职|面试|生意"
    ).unwrap();

    // =========================================================================
    // Wealth: money, trades, investments
    // =========================================================================
    static ref RE_WEALTH: Regex = Regex::new(
        r"(?i)\b(money|wealth|rich|profit|profits|invest|investment|investing|stock|stocks|salary|income|loan|debt|finance|financial|deal|trade|trading)\b|财|钱|投资|股票"
    ).unwrap();

    // =========================================================================
    // Relationship: romance, marriage
    // =========================================================================
    static ref RE_RELATIONSHIP: Regex = Regex::new(
        r"(?i)\b(love|relationship|partner|marriage|marry|married|wedding|dating|date|boyfriend|girlfriend|husband|wife|romance|crush|divorce)\b|感情|婚|恋爱"
    ).unwrap();

    // =========================================================================
    // Health: illness, treatment
    // =========================================================================
    static ref RE_HEALTH: Regex = Regex::new(
        r"(?i)\b(health|healthy|sick|sickness|illness|ill|disease|doctor|hospital|surgery|recovery|recover|treatment|medicine|pain)\b|健康|病|医"
    ).unwrap();

    // =========================================================================
    // Study: exams, schooling, documents
    // =========================================================================
    static ref RE_STUDY: Regex = Regex::new(
        r"(?i)\b(study|studies|exam|exams|test|school|university|college|degree|thesis|admission|scholarship|learn|learning)\b|考试|学习|学业"
    ).unwrap();

    // =========================================================================
    // Travel: trips, moves
    // =========================================================================
    static ref RE_TRAVEL: Regex = Regex::new(
        r"(?i)\b(travel|trip|journey|flight|fly|abroad|visa|move|moving|relocate|relocation|vacation)\b|出行|旅行|搬家"
    ).unwrap();

    // =========================================================================
    // Legal: disputes, courts
    // =========================================================================
    static ref RE_LEGAL: Regex = Regex::new(
        r"(?i)\b(lawsuit|court|legal|lawyer|judge|dispute|contract|sue|sued|trial|verdict|litigation)\b|官司|诉讼|合同"
    ).unwrap();
}

/// Picks an intent from free text
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    categories: Vec<(Intent, &'static Regex)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            categories: vec![
                (Intent::Career, &*RE_CAREER),
                (Intent::Wealth, &*RE_WEALTH),
                (Intent::Relationship, &*RE_RELATIONSHIP),
                (Intent::Health, &*RE_HEALTH),
                (Intent::Study, &*RE_STUDY),
                (Intent::Travel, &*RE_TRAVEL),
                (Intent::Legal, &*RE_LEGAL),
            ],
        }
    }

    /// First matching category, `General` when nothing matches
    pub fn classify(&self, query: &str) -> Intent {
        let intent = self
            .categories
            .iter()
            .find(|(_, re)| re.is_match(query))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General);
        debug!(intent = %intent, "query classified");
        intent
    }
}

// =============================================================================
// SUBJECT REGISTRY
// =============================================================================

/// Where an intent's subject marker comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Day pillar stem (Jia resolved)
    Querent,
    /// Hour pillar stem (Jia resolved)
    Matter,
    /// Partner stem picked by the querent's gender
    Partner,
    Fixed(Marker),
}

/// Subjects per intent, in report order
fn registry(intent: Intent) -> &'static [(&'static str, Source)] {
    use Source::*;
    match intent {
        Intent::General => &[("self", Querent), ("matter", Matter)],
        Intent::Career => &[
            ("self", Querent),
            ("matter", Matter),
            ("career", Fixed(Marker::Door(Door::Open))),
            ("authority", Fixed(Marker::Guardian(Guardian::Chief))),
        ],
        Intent::Wealth => &[
            ("self", Querent),
            ("capital", Fixed(Marker::Stem(Stem::Wu))),
            ("growth", Fixed(Marker::Door(Door::Life))),
        ],
        Intent::Relationship => &[
            ("self", Querent),
            ("partner", Partner),
            ("harmony", Fixed(Marker::Guardian(Guardian::Harmony))),
        ],
        Intent::Health => &[
            ("self", Querent),
            ("illness", Fixed(Marker::Star(Star::Rui))),
            ("remedy", Fixed(Marker::Star(Star::Xin))),
        ],
        Intent::Study => &[
            ("self", Querent),
            ("documents", Fixed(Marker::Stem(Stem::Ding))),
            ("exam", Fixed(Marker::Door(Door::Scenery))),
        ],
        Intent::Travel => &[
            ("self", Querent),
            ("route", Fixed(Marker::Door(Door::Open))),
            ("journey", Fixed(Marker::Guardian(Guardian::NineHeaven))),
        ],
        Intent::Legal => &[
            ("self", Querent),
            ("dispute", Fixed(Marker::Door(Door::Fear))),
            ("ruling", Fixed(Marker::Door(Door::Open))),
        ],
    }
}

/// Partner stem: Geng stands for a man, Yi for a woman
fn partner_stem(gender: Gender) -> Stem {
    match gender {
        Gender::Female => Stem::Geng,
        Gender::Male => Stem::Yi,
    }
}

/// Resolve an intent's subjects against the pillars.
///
/// The partner subject is dropped when the gender is unknown; a natal year
/// pillar adds a trailing "natal" subject.
pub fn select_subjects(
    intent: Intent,
    pillars: &FourPillars,
    profile: Option<&Profile>,
    natal_year: Option<SexagenaryLabel>,
) -> Vec<Subject> {
    let gender = profile.and_then(|p| p.gender);
    let mut subjects: Vec<Subject> = registry(intent)
        .iter()
        .filter_map(|(name, source)| {
            let marker = match source {
                Source::Querent => Marker::Stem(pillars.day.plate_stem()),
                Source::Matter => Marker::Stem(pillars.hour.plate_stem()),
                Source::Partner => Marker::Stem(partner_stem(gender?)),
                Source::Fixed(marker) => *marker,
            };
            Some(Subject {
                name: name.to_string(),
                marker,
            })
        })
        .collect();

    if let Some(year) = natal_year {
        subjects.push(Subject {
            name: "natal".to_string(),
            marker: Marker::Stem(year.plate_stem()),
        });
    }
    subjects
}

// =============================================================================
// TESTS
// =============================================================================
