//! Pattern analyzer: a thin interpreter over a declarative rule table
//!
//! Each rule is tested at every palace independently. Stem, door, star and
//! guardian predicates read the Heaven layer; stem pairs read Heaven over
//! Ground; displacement rules fire once, at the hour palace.

use std::cmp::Reverse;

use tracing::debug;

use crate::types::{
    Displacement, Door, Guardian, Palace, PatternMatch, PatternRule, PhaseRelation, Plate,
    Polarity, RulePredicate, Star, Stem,
};
use crate::MAX_RULE_MAGNITUDE;

use Polarity::{Auspicious, Inauspicious};
// The Displacement type shadows the variant of the same name
use RulePredicate::*;

const fn rule(
    id: u16,
    name: &'static str,
    predicate: RulePredicate,
    polarity: Polarity,
    magnitude: i8,
) -> PatternRule {
    PatternRule {
        id,
        name,
        predicate,
        polarity,
        magnitude,
    }
}

/// Built-in rule table
pub const DEFAULT_RULES: &[PatternRule] = &[
    // =========================================================================
    // Heaven stem over ground stem
    // =========================================================================
    rule(1, "Blue Dragon Returns", StemOverStem { heaven: Stem::Wu, ground: Stem::Bing }, Auspicious, 20),
    rule(2, "Bird Falls into Nest", StemOverStem { heaven: Stem::Bing, ground: Stem::Wu }, Auspicious, 20),
    rule(3, "Blue Dragon Flees", StemOverStem { heaven: Stem::Yi, ground: Stem::Xin }, Inauspicious, -18),
    rule(4, "White Tiger Rampant", StemOverStem { heaven: Stem::Xin, ground: Stem::Yi }, Inauspicious, -18),
    rule(5, "Mars Enters Venus", StemOverStem { heaven: Stem::Bing, ground: Stem::Geng }, Inauspicious, -12),
    rule(6, "Venus Enters Mars", StemOverStem { heaven: Stem::Geng, ground: Stem::Bing }, Inauspicious, -15),
    rule(7, "Serpent Writhes", StemOverStem { heaven: Stem::Gui, ground: Stem::Ding }, Inauspicious, -16),
    rule(8, "Red Bird Dives into River", StemOverStem { heaven: Stem::Ding, ground: Stem::Gui }, Inauspicious, -16),
    rule(9, "Sun Meets Moon", StemOverStem { heaven: Stem::Yi, ground: Stem::Bing }, Auspicious, 12),
    rule(10, "Star Follows Moon", StemOverStem { heaven: Stem::Bing, ground: Stem::Ding }, Auspicious, 12),
    rule(11, "Twin Geng Clash", StemOverStem { heaven: Stem::Geng, ground: Stem::Geng }, Inauspicious, -14),
    rule(12, "Great Block", StemOverStem { heaven: Stem::Geng, ground: Stem::Gui }, Inauspicious, -14),
    rule(13, "Punishing Block", StemOverStem { heaven: Stem::Geng, ground: Stem::Ji }, Inauspicious, -12),
    // =========================================================================
    // Wonders meeting doors and guardians
    // =========================================================================
    rule(20, "Yi at Open Door", StemWithDoor { stem: Stem::Yi, door: Door::Open }, Auspicious, 15),
    rule(21, "Bing at Rest Door", StemWithDoor { stem: Stem::Bing, door: Door::Rest }, Auspicious, 15),
    rule(22, "Ding at Life Door", StemWithDoor { stem: Stem::Ding, door: Door::Life }, Auspicious, 15),
    rule(23, "Ding under Moon", StemWithGuardian { stem: Stem::Ding, guardian: Guardian::Moon }, Auspicious, 10),
    rule(24, "Yi in Nine Earth", StemWithGuardian { stem: Stem::Yi, guardian: Guardian::NineEarth }, Auspicious, 10),
    rule(25, "Bing in Nine Heaven", StemWithGuardian { stem: Stem::Bing, guardian: Guardian::NineHeaven }, Auspicious, 10),
    rule(26, "Geng Meets Tiger", StemWithGuardian { stem: Stem::Geng, guardian: Guardian::Tiger }, Inauspicious, -12),
    rule(27, "Ding under Heart Star", StemWithStar { stem: Stem::Ding, star: Star::Xin }, Auspicious, 8),
    rule(30, "Open Door under Heart Star", DoorWithStar { door: Door::Open, star: Star::Xin }, Auspicious, 8),
    rule(31, "Death Door under Sickness Star", DoorWithStar { door: Door::Death, star: Star::Rui }, Inauspicious, -14),
    // =========================================================================
    // Stems punished or entombed by their palace
    // =========================================================================
    rule(40, "Wu Punished in Zhen", StemInPalace { stem: Stem::Wu, palace: Palace::Zhen }, Inauspicious, -10),
    rule(41, "Ji Punished in Kun", StemInPalace { stem: Stem::Ji, palace: Palace::Kun }, Inauspicious, -10),
    rule(42, "Geng Punished in Gen", StemInPalace { stem: Stem::Geng, palace: Palace::Gen }, Inauspicious, -10),
    rule(43, "Xin Punished in Li", StemInPalace { stem: Stem::Xin, palace: Palace::Li }, Inauspicious, -10),
    rule(44, "Ren Punished in Xun", StemInPalace { stem: Stem::Ren, palace: Palace::Xun }, Inauspicious, -10),
    rule(45, "Gui Punished in Xun", StemInPalace { stem: Stem::Gui, palace: Palace::Xun }, Inauspicious, -10),
    rule(46, "Yi Entombed in Qian", StemInPalace { stem: Stem::Yi, palace: Palace::Qian }, Inauspicious, -8),
    rule(47, "Bing Entombed in Qian", StemInPalace { stem: Stem::Bing, palace: Palace::Qian }, Inauspicious, -8),
    rule(48, "Ding Entombed in Gen", StemInPalace { stem: Stem::Ding, palace: Palace::Gen }, Inauspicious, -8),
    rule(49, "Death Door Locked in Kan", DoorInPalace { door: Door::Death, palace: Palace::Kan }, Inauspicious, -6),
    // =========================================================================
    // Doors against their palace
    // =========================================================================
    rule(60, "Door Strikes Palace", DoorAgainstPalace { relation: PhaseRelation::Restrains }, Inauspicious, -8),
    rule(61, "Palace Feeds Door", DoorAgainstPalace { relation: PhaseRelation::GeneratedBy }, Auspicious, 6),
    // =========================================================================
    // Whole-plate displacement
    // =========================================================================
    rule(70, "Hidden Chant", RulePredicate::Displacement { class: Displacement::Unmoved }, Inauspicious, -12),
    rule(71, "Reversed Chant", RulePredicate::Displacement { class: Displacement::Opposite }, Inauspicious, -15),
];

/// Whether `predicate` holds at `palace`
pub fn predicate_holds(predicate: &RulePredicate, plate: &Plate, palace: Palace) -> bool {
    let heaven = plate.heaven.get(palace);
    match *predicate {
        StemOverStem { heaven: top, ground } => {
            heaven.stem == top && plate.ground.get(palace).stem == ground
        }
        StemWithDoor { stem, door } => heaven.stem == stem && heaven.door == Some(door),
        StemWithGuardian { stem, guardian } => {
            heaven.stem == stem && heaven.guardian == Some(guardian)
        }
        StemWithStar { stem, star } => heaven.stem == stem && heaven.star == star,
        DoorWithStar { door, star } => heaven.door == Some(door) && heaven.star == star,
        StemInPalace { stem, palace: at } => heaven.stem == stem && palace == at,
        DoorInPalace { door, palace: at } => heaven.door == Some(door) && palace == at,
        DoorAgainstPalace { relation } => heaven
            .door
            .map(|door| door.element().relation_to(palace.element()) == relation)
            .unwrap_or(false),
        RulePredicate::Displacement { class } => {
            palace == plate.hour_palace && plate.overall_displacement() == class
        }
    }
}

/// Order matches by |magnitude| desc, then rule id, then palace number
pub fn sort_matches(matches: &mut [PatternMatch]) {
    matches.sort_by_key(|m| {
        (
            Reverse(m.magnitude.unsigned_abs()),
            m.rule_id,
            m.palace.number(),
        )
    });
}

/// Applies a rule table to plates
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    rules: Vec<PatternRule>,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl PatternAnalyzer {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        debug_assert!(
            rules.iter().all(|r| r.magnitude.unsigned_abs() <= MAX_RULE_MAGNITUDE as u8),
            "rule magnitude outside ±{}",
            MAX_RULE_MAGNITUDE
        );
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// All matches on a plate, sorted
    pub fn analyze(&self, plate: &Plate) -> Vec<PatternMatch> {
        let mut matches: Vec<PatternMatch> = self
            .rules
            .iter()
            .flat_map(|rule| {
                Palace::ALL
                    .into_iter()
                    .filter(move |palace| predicate_holds(&rule.predicate, plate, *palace))
                    .map(move |palace| PatternMatch::from_rule(rule, palace))
            })
            .collect();
        sort_matches(&mut matches);

        debug!(
            rules = self.rules.len(),
            matches = matches.len(),
            net = matches.iter().map(|m| m.magnitude as i32).sum::<i32>(),
            "patterns analyzed"
        );
        matches
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plate::PlateBuilder;
    use crate::types::{Cycle, Direction, SexagenaryLabel};
    use std::collections::HashSet;

    fn scenario_plate() -> Plate {
        let cycle = Cycle::new(3, Direction::Descending).unwrap();
        PlateBuilder::new().build(cycle, SexagenaryLabel::from_index(30)).0
    }

    fn opposite_plate() -> Plate {
        let cycle = Cycle::new(1, Direction::Ascending).unwrap();
        PlateBuilder::new().build(cycle, SexagenaryLabel::from_index(1)).0
    }

    #[test]
    fn test_rule_ids_unique() {
        let ids: HashSet<u16> = DEFAULT_RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), DEFAULT_RULES.len());
    }

    #[test]
    fn test_magnitudes_bounded_and_signed_by_polarity() {
        for rule in DEFAULT_RULES {
            assert!(rule.magnitude.abs() <= MAX_RULE_MAGNITUDE, "rule {}", rule.id);
            match rule.polarity {
                Polarity::Auspicious => assert!(rule.magnitude > 0, "rule {}", rule.id),
                Polarity::Inauspicious => assert!(rule.magnitude < 0, "rule {}", rule.id),
            }
        }
    }

    #[test]
    fn test_scenario_fires_hidden_chant_and_xin_punishment() {
        let matches = PatternAnalyzer::default().analyze(&scenario_plate());
        let fired: Vec<(u16, Palace)> = matches.iter().map(|m| (m.rule_id, m.palace)).collect();
        assert!(fired.contains(&(70, Palace::Li)));
        assert!(fired.contains(&(43, Palace::Li)));
        // Unmoved plate: no stem sits over a different stem
        assert!(matches.iter().all(|m| m.rule_id > 13 || m.rule_id == 11));
    }

    #[test]
    fn test_displacement_rule_fires_once() {
        let matches = PatternAnalyzer::default().analyze(&opposite_plate());
        let reversed: Vec<&PatternMatch> = matches.iter().filter(|m| m.rule_id == 71).collect();
        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0].palace, Palace::Li);
        assert!(matches.iter().all(|m| m.rule_id != 70));
    }

    #[test]
    fn test_output_is_sorted() {
        let matches = PatternAnalyzer::default().analyze(&opposite_plate());
        for pair in matches.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key = |m: &PatternMatch| (Reverse(m.magnitude.unsigned_abs()), m.rule_id, m.palace.number());
            assert!(key(a) <= key(b));
        }
    }

    #[test]
    fn test_stem_pair_reads_both_layers() {
        // Opposite plate: heaven Li holds Kan's Wu, ground Li holds Yi
        let plate = opposite_plate();
        let probe = rule(900, "probe", StemOverStem { heaven: Stem::Wu, ground: Stem::Yi }, Auspicious, 1);
        let matches = PatternAnalyzer::new(vec![probe]).analyze(&plate);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].palace, Palace::Li);
    }

    #[test]
    fn test_inert_rule_changes_nothing() {
        let plate = opposite_plate();
        let base = PatternAnalyzer::default().analyze(&plate);

        let mut rules = DEFAULT_RULES.to_vec();
        // Jia never shows on the plate
        rules.push(rule(999, "inert", StemInPalace { stem: Stem::Jia, palace: Palace::Kan }, Auspicious, 25));
        let extended = PatternAnalyzer::new(rules).analyze(&plate);
        assert_eq!(base, extended);
    }

    #[test]
    fn test_sort_ties_break_on_id_then_palace() {
        let mut matches = vec![
            PatternMatch { rule_id: 5, name: "b".into(), palace: Palace::Li, polarity: Inauspicious, magnitude: -10 },
            PatternMatch { rule_id: 5, name: "b".into(), palace: Palace::Kan, polarity: Inauspicious, magnitude: -10 },
            PatternMatch { rule_id: 2, name: "a".into(), palace: Palace::Dui, polarity: Auspicious, magnitude: 10 },
            PatternMatch { rule_id: 9, name: "c".into(), palace: Palace::Dui, polarity: Auspicious, magnitude: 20 },
        ];
        sort_matches(&mut matches);
        let order: Vec<(u16, u8)> = matches.iter().map(|m| (m.rule_id, m.palace.number())).collect();
        assert_eq!(order, vec![(9, 7), (2, 7), (5, 1), (5, 9)]);
    }
}
