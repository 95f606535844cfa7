//! Plate builder: Ground layer by anchored walks, Heaven layer by ring rotation
//!
//! Every family is laid down the same way: one symbol at an anchor palace,
//! the rest walked palace by palace in the cycle direction with wrap-around.
//! Stems walk the nine Luo Shu numbers (center included); doors and
//! guardians walk the eight-palace ring and never touch the center.

use tracing::{debug, warn};

use crate::types::{
    Advisory, Cycle, Direction, Displacement, Door, Guardian, Layer, Marker, Palace, PalaceBundle,
    Plate, ReasonCode, SexagenaryLabel, Star, Stem,
};

/// Order the nine visible stems are laid down in (Jia stays hidden)
pub const STEM_SEQUENCE: [Stem; 9] = [
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
    Stem::Ding,
    Stem::Bing,
    Stem::Yi,
];

/// Place `symbols[first]` at `ring[anchor]` and walk the rest.
///
/// Palaces advance by `palace_step`, symbols by `symbol_step`; both wrap.
/// Returns one `(palace, symbol)` per ring slot.
pub fn walk<T: Copy>(
    symbols: &[T],
    first: usize,
    ring: &[Palace],
    anchor: usize,
    palace_step: i64,
    symbol_step: i64,
) -> Vec<(Palace, T)> {
    let n_ring = ring.len() as i64;
    let n_symbols = symbols.len() as i64;
    (0..ring.len() as i64)
        .map(|j| {
            let palace = ring[(anchor as i64 + j * palace_step).rem_euclid(n_ring) as usize];
            let symbol = symbols[(first as i64 + j * symbol_step).rem_euclid(n_symbols) as usize];
            (palace, symbol)
        })
        .collect()
}

/// Ring slot of a palace, the center lodging in Kun
fn ring_slot(palace: Palace) -> usize {
    palace.ring_anchor().ring_position().unwrap_or(5)
}

/// Heaven layer and its bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    pub heaven: Layer,
    pub source: [Palace; 9],
    pub displacement: [Displacement; 9],
    pub hour_palace: Palace,
    /// Clockwise ring steps (0-7)
    pub steps: u8,
    pub degraded: bool,
}

/// Builds plates; holds no state
#[derive(Debug, Clone, Copy, Default)]
pub struct PlateBuilder;

impl PlateBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Full plate for a cycle and hour pillar
    pub fn build(&self, cycle: Cycle, hour: SexagenaryLabel) -> (Plate, Vec<Advisory>) {
        let (ground, lead_palace) = self.ground_layer(cycle, hour);
        let hour_marker = hour.plate_stem();
        let rotation = self.rotate(&ground, lead_palace, hour_marker);

        let mut advisories = Vec::new();
        if rotation.degraded {
            advisories.push(Advisory::new(
                ReasonCode::R201_HOUR_MARKER_MISSING,
                format!("{} not on ground layer", hour_marker),
            ));
        }

        debug!(
            cycle = %cycle,
            hour = %hour,
            lead = %lead_palace,
            hour_palace = %rotation.hour_palace,
            steps = rotation.steps,
            "plate built"
        );

        let plate = Plate {
            cycle,
            hour,
            ground,
            heaven: rotation.heaven,
            source: rotation.source,
            displacement: rotation.displacement,
            lead_palace,
            hour_marker,
            hour_palace: rotation.hour_palace,
            rotation: rotation.steps,
            degraded: rotation.degraded,
        };
        (plate, advisories)
    }

    /// Ground layer plus the lead palace (where the hour's xun stem sits)
    pub fn ground_layer(&self, cycle: Cycle, hour: SexagenaryLabel) -> (Layer, Palace) {
        let step = cycle.direction.step();

        let mut stems = [Stem::Wu; 9];
        for (palace, stem) in walk(&STEM_SEQUENCE, 0, &Palace::ALL, cycle.ju as usize - 1, step, 1) {
            stems[palace.index()] = stem;
        }

        let xun_stem = hour.hidden_stem();
        let lead_palace = Palace::ALL
            .into_iter()
            .find(|p| stems[p.index()] == xun_stem)
            .unwrap_or(Palace::Center);

        let mut stars = [Star::Qin; 9];
        let lead_star = Star::home_of(lead_palace);
        for (palace, star) in walk(&Star::ALL, lead_star.index(), &Palace::ALL, lead_palace.index(), step, step) {
            stars[palace.index()] = star;
        }

        let doors = door_ring(lead_palace, hour, cycle.direction);
        let guardians = guardian_ring(lead_palace, cycle.direction);

        let layer = Layer::new(std::array::from_fn(|i| PalaceBundle {
            stem: stems[i],
            star: stars[i],
            door: doors[i],
            guardian: guardians[i],
        }));
        (layer, lead_palace)
    }

    /// Rotate the outer ring so the lead bundle lands on the hour marker's palace.
    ///
    /// A marker missing from the ground layer leaves the ring unrotated and
    /// flags the result degraded.
    pub fn rotate(&self, ground: &Layer, lead_palace: Palace, marker: Stem) -> Rotation {
        let (hour_palace, degraded) = match ground.find(Marker::Stem(marker)) {
            Some(palace) => (palace, false),
            None => {
                warn!(marker = %marker, "hour marker not on ground layer, skipping rotation");
                (lead_palace, true)
            }
        };

        let steps = if degraded {
            0
        } else {
            (ring_slot(hour_palace) + 8 - ring_slot(lead_palace)) % 8
        };

        let source: [Palace; 9] = std::array::from_fn(|i| {
            let palace = Palace::ALL[i];
            match palace.ring_position() {
                Some(pos) => Palace::RING[(pos + 8 - steps) % 8],
                None => palace,
            }
        });

        let outer = Displacement::from_ring_steps(steps);
        let displacement: [Displacement; 9] = std::array::from_fn(|i| {
            if Palace::ALL[i].is_center() {
                Displacement::Unmoved
            } else {
                outer
            }
        });

        let heaven = Layer::new(std::array::from_fn(|i| *ground.get(source[i])));

        Rotation {
            heaven,
            source,
            displacement,
            hour_palace,
            steps: steps as u8,
            degraded,
        }
    }
}

/// Doors: the lead palace's home door sits at the hour branch's palace,
/// the ring turning with it
fn door_ring(lead_palace: Palace, hour: SexagenaryLabel, direction: Direction) -> [Option<Door>; 9] {
    let lead_door = Door::home_of(lead_palace);
    let anchor = ring_slot(hour.branch.palace());
    let step = direction.step();
    let mut doors = [None; 9];
    for (palace, door) in walk(&Door::ALL, lead_door.index(), &Palace::RING, anchor, step, step) {
        doors[palace.index()] = Some(door);
    }
    doors
}

/// Guardians: Chief at the lead palace, the rest following the direction
fn guardian_ring(lead_palace: Palace, direction: Direction) -> [Option<Guardian>; 9] {
    let mut guardians = [None; 9];
    for (palace, guardian) in walk(
        &Guardian::ALL,
        0,
        &Palace::RING,
        ring_slot(lead_palace),
        direction.step(),
        1,
    ) {
        guardians[palace.index()] = Some(guardian);
    }
    guardians
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario() -> Plate {
        let cycle = Cycle::new(3, Direction::Descending).unwrap();
        PlateBuilder::new().build(cycle, SexagenaryLabel::from_index(30)).0
    }

    #[test]
    fn test_walk_wraps_both_ways() {
        let placed = walk(&['a', 'b', 'c'], 0, &Palace::RING[..3], 1, -1, 1);
        assert_eq!(
            placed,
            vec![(Palace::Gen, 'a'), (Palace::Kan, 'b'), (Palace::Zhen, 'c')]
        );
    }

    #[test]
    fn test_ground_stems_descending_ju_3() {
        let plate = scenario();
        let stems: Vec<Stem> = plate.ground.iter().map(|(_, b)| b.stem).collect();
        assert_eq!(
            stems,
            vec![
                Stem::Geng, // 1
                Stem::Ji,   // 2
                Stem::Wu,   // 3
                Stem::Yi,   // 4
                Stem::Bing, // 5
                Stem::Ding, // 6
                Stem::Gui,  // 7
                Stem::Ren,  // 8
                Stem::Xin,  // 9
            ]
        );
    }

    #[test]
    fn test_scenario_lead_and_rotation() {
        let plate = scenario();
        // JiaWu hides under Xin, which sits in Li
        assert_eq!(plate.lead_palace, Palace::Li);
        assert_eq!(plate.hour_marker, Stem::Xin);
        assert_eq!(plate.hour_palace, Palace::Li);
        assert_eq!(plate.rotation, 0);
        assert_eq!(plate.overall_displacement(), Displacement::Unmoved);
        assert_eq!(plate.heaven, plate.ground);
        assert!(!plate.degraded);
    }

    #[test]
    fn test_scenario_guardians_run_counterclockwise() {
        let plate = scenario();
        assert_eq!(plate.ground.get(Palace::Li).guardian, Some(Guardian::Chief));
        assert_eq!(plate.ground.get(Palace::Xun).guardian, Some(Guardian::Serpent));
        assert_eq!(plate.ground.get(Palace::Kun).guardian, Some(Guardian::NineHeaven));
    }

    #[test]
    fn test_stars_and_doors_home_when_lead_meets_hour_branch() {
        let plate = scenario();
        for (palace, bundle) in plate.ground.iter() {
            assert_eq!(bundle.star, Star::home_of(palace));
            if !palace.is_center() {
                assert_eq!(bundle.door, Some(Door::home_of(palace)));
            }
        }
    }

    #[test]
    fn test_opposite_rotation() {
        // Ju 1 ascending, YiChou hour: lead Wu in Kan, marker Yi in Li
        let cycle = Cycle::new(1, Direction::Ascending).unwrap();
        let (plate, advisories) = PlateBuilder::new().build(cycle, SexagenaryLabel::from_index(1));
        assert!(advisories.is_empty());
        assert_eq!(plate.lead_palace, Palace::Kan);
        assert_eq!(plate.hour_palace, Palace::Li);
        assert_eq!(plate.rotation, 4);
        assert_eq!(plate.displacement_at(Palace::Zhen), Displacement::Opposite);
        assert_eq!(plate.displacement_at(Palace::Center), Displacement::Unmoved);
        assert_eq!(plate.source_of(Palace::Li), Palace::Kan);
        assert_eq!(plate.heaven.get(Palace::Li), plate.ground.get(Palace::Kan));
        assert_eq!(plate.heaven.get(Palace::Center), plate.ground.get(Palace::Center));
    }

    #[test]
    fn test_doors_follow_hour_branch() {
        // YiChou hour: Kan's Rest door moves to Gen, the ring turning clockwise
        let cycle = Cycle::new(1, Direction::Ascending).unwrap();
        let (ground, _) = PlateBuilder::new().ground_layer(cycle, SexagenaryLabel::from_index(1));
        assert_eq!(ground.get(Palace::Gen).door, Some(Door::Rest));
        assert_eq!(ground.get(Palace::Zhen).door, Some(Door::Life));
        assert_eq!(ground.get(Palace::Kan).door, Some(Door::Open));
    }

    #[test]
    fn test_missing_marker_degrades_without_rotation() {
        let plate = scenario();
        let rotation = PlateBuilder::new().rotate(&plate.ground, plate.lead_palace, Stem::Jia);
        assert!(rotation.degraded);
        assert_eq!(rotation.steps, 0);
        assert_eq!(rotation.heaven, plate.ground);
        assert_eq!(rotation.hour_palace, plate.lead_palace);
    }

    #[test]
    fn test_center_lead_lodges_in_kun() {
        // Ju 5 ascending puts Wu in the center; JiaZi hour leads from there
        let cycle = Cycle::new(5, Direction::Ascending).unwrap();
        let (ground, lead) = PlateBuilder::new().ground_layer(cycle, SexagenaryLabel::from_index(0));
        assert_eq!(lead, Palace::Center);
        assert_eq!(ground.get(Palace::Kun).guardian, Some(Guardian::Chief));
        assert_eq!(ground.get(Palace::Center).door, None);
        assert_eq!(ground.get(Palace::Center).guardian, None);
    }
}
