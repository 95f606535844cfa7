//! Integration tests for plate construction
//!
//! - Ground stems and stars fill all nine palaces exactly once
//! - Doors and guardians fill the eight outer palaces, never the center
//! - Heaven is a rearrangement of Ground (same marker multiset)
//! - Identical inputs give byte-identical plates

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use qimen::core::plate::{PlateBuilder, STEM_SEQUENCE};
use qimen::types::{
    Cycle, Direction, Displacement, Door, Guardian, Palace, Plate, SexagenaryLabel, Star, Stem,
};

fn build(ju: u8, ascending: bool, hour: i64) -> Plate {
    let direction = if ascending {
        Direction::Ascending
    } else {
        Direction::Descending
    };
    let cycle = Cycle::new(ju, direction).unwrap();
    PlateBuilder::new().build(cycle, SexagenaryLabel::from_index(hour)).0
}

#[test]
fn test_every_cycle_and_hour_builds_cleanly() {
    for ju in 1..=9 {
        for ascending in [true, false] {
            for hour in 0..60 {
                let plate = build(ju, ascending, hour);
                assert!(!plate.degraded, "ju {} {} hour {}", ju, ascending, hour);
                assert_eq!(
                    plate.ground.get(plate.hour_palace).stem,
                    plate.hour_marker
                );
            }
        }
    }
}

#[test]
fn test_jia_hours_do_not_rotate() {
    // A Jia hour's marker is its own xun stem, so the lead stays put
    for hour in [0, 10, 20, 30, 40, 50] {
        let plate = build(7, true, hour);
        assert_eq!(plate.rotation, 0);
        assert_eq!(plate.heaven, plate.ground);
    }
}

#[test]
fn test_scenario_plate() {
    let plate = build(3, false, 30);
    let heaven: Vec<(Stem, Star, Option<Door>, Option<Guardian>)> = plate
        .heaven
        .iter()
        .map(|(_, b)| (b.stem, b.star, b.door, b.guardian))
        .collect();
    assert_eq!(
        heaven,
        vec![
            (Stem::Geng, Star::Peng, Some(Door::Rest), Some(Guardian::Tiger)),
            (Stem::Ji, Star::Rui, Some(Door::Death), Some(Guardian::NineHeaven)),
            (Stem::Wu, Star::Chong, Some(Door::Harm), Some(Guardian::Moon)),
            (Stem::Yi, Star::Fu, Some(Door::Delusion), Some(Guardian::Serpent)),
            (Stem::Bing, Star::Qin, None, None),
            (Stem::Ding, Star::Xin, Some(Door::Open), Some(Guardian::Tortoise)),
            (Stem::Gui, Star::Zhu, Some(Door::Fear), Some(Guardian::NineEarth)),
            (Stem::Ren, Star::Ren, Some(Door::Life), Some(Guardian::Harmony)),
            (Stem::Xin, Star::Ying, Some(Door::Scenery), Some(Guardian::Chief)),
        ]
    );
}

proptest! {
    #[test]
    fn prop_ground_is_a_placement(ju in 1u8..=9, ascending: bool, hour in 0i64..60) {
        let plate = build(ju, ascending, hour);

        let stems: HashSet<Stem> = plate.ground.iter().map(|(_, b)| b.stem).collect();
        prop_assert_eq!(stems, STEM_SEQUENCE.into_iter().collect::<HashSet<_>>());

        let stars: HashSet<Star> = plate.ground.iter().map(|(_, b)| b.star).collect();
        prop_assert_eq!(stars.len(), 9);

        let center = plate.ground.get(Palace::Center);
        prop_assert!(center.door.is_none() && center.guardian.is_none());

        let doors: HashSet<Door> = plate.ground.iter().filter_map(|(_, b)| b.door).collect();
        let guardians: HashSet<Guardian> = plate.ground.iter().filter_map(|(_, b)| b.guardian).collect();
        prop_assert_eq!(doors.len(), 8);
        prop_assert_eq!(guardians.len(), 8);
    }

    #[test]
    fn prop_heaven_preserves_markers(ju in 1u8..=9, ascending: bool, hour in 0i64..60) {
        let plate = build(ju, ascending, hour);
        prop_assert_eq!(plate.heaven.marker_multiset(), plate.ground.marker_multiset());
        prop_assert_eq!(plate.heaven.get(Palace::Center), plate.ground.get(Palace::Center));
        prop_assert_eq!(plate.displacement_at(Palace::Center), Displacement::Unmoved);

        let sources: HashSet<Palace> = plate.source.iter().copied().collect();
        prop_assert_eq!(sources.len(), 9);
        for palace in Palace::ALL {
            prop_assert_eq!(plate.heaven.get(palace), plate.ground.get(plate.source_of(palace)));
        }
    }

    #[test]
    fn prop_lead_bundle_lands_on_hour_palace(ju in 1u8..=9, ascending: bool, hour in 0i64..60) {
        let plate = build(ju, ascending, hour);
        let lead = plate.ground.get(plate.lead_palace.ring_anchor());
        prop_assert_eq!(plate.heaven.get(plate.hour_palace.ring_anchor()), lead);
    }

    #[test]
    fn prop_build_is_deterministic(ju in 1u8..=9, ascending: bool, hour in 0i64..60) {
        let a = build(ju, ascending, hour);
        let b = build(ju, ascending, hour);
        prop_assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
        prop_assert_eq!(a, b);
    }
}
