//! Plate structures: palace bundles, the two layers and displacement classes

use serde::{Deserialize, Serialize};

use crate::types::{Cycle, Door, Element, Guardian, Palace, SexagenaryLabel, Star, Stem};

/// A symbol from any family, tagged with its family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "family", content = "symbol", rename_all = "lowercase")]
pub enum Marker {
    Stem(Stem),
    Star(Star),
    Door(Door),
    Guardian(Guardian),
}

impl Marker {
    pub fn element(&self) -> Element {
        match self {
            Marker::Stem(s) => s.element(),
            Marker::Star(s) => s.element(),
            Marker::Door(d) => d.element(),
            Marker::Guardian(g) => g.element(),
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marker::Stem(s) => write!(f, "stem {}", s),
            Marker::Star(s) => write!(f, "star {}", s),
            Marker::Door(d) => write!(f, "door {}", d),
            Marker::Guardian(g) => write!(f, "guardian {}", g),
        }
    }
}

/// Everything one palace holds on one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PalaceBundle {
    pub stem: Stem,
    pub star: Star,
    /// Never set in the center
    pub door: Option<Door>,
    /// Never set in the center
    pub guardian: Option<Guardian>,
}

impl PalaceBundle {
    pub fn holds(&self, marker: Marker) -> bool {
        match marker {
            Marker::Stem(s) => self.stem == s,
            Marker::Star(s) => self.star == s,
            Marker::Door(d) => self.door == Some(d),
            Marker::Guardian(g) => self.guardian == Some(g),
        }
    }

    /// Every marker in the bundle
    pub fn markers(&self) -> Vec<Marker> {
        let mut out = vec![Marker::Stem(self.stem), Marker::Star(self.star)];
        out.extend(self.door.map(Marker::Door));
        out.extend(self.guardian.map(Marker::Guardian));
        out
    }
}

/// Which overlay a marker was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Heaven,
    Ground,
}

/// Nine bundles indexed by palace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    palaces: [PalaceBundle; 9],
}

impl Layer {
    pub fn new(palaces: [PalaceBundle; 9]) -> Self {
        Self { palaces }
    }

    pub fn get(&self, palace: Palace) -> &PalaceBundle {
        &self.palaces[palace.index()]
    }

    /// Bundles in Luo Shu number order
    pub fn iter(&self) -> impl Iterator<Item = (Palace, &PalaceBundle)> {
        Palace::ALL.into_iter().zip(self.palaces.iter())
    }

    /// First palace (by number) holding `marker`
    pub fn find(&self, marker: Marker) -> Option<Palace> {
        self.iter()
            .find(|(_, bundle)| bundle.holds(marker))
            .map(|(palace, _)| palace)
    }

    /// All markers on the layer, sorted, for multiset comparisons
    pub fn marker_multiset(&self) -> Vec<Marker> {
        let mut all: Vec<Marker> = self.palaces.iter().flat_map(|b| b.markers()).collect();
        all.sort();
        all
    }
}

/// How far a heaven palace's bundle travelled from its ground position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Displacement {
    /// Bundle did not move (fu yin)
    Unmoved,
    /// Bundle landed across the plate (fan yin)
    Opposite,
    /// One or two ring steps
    Small,
    /// Three ring steps
    Large,
}

impl Displacement {
    /// Classify a clockwise ring rotation of `steps` (0-7)
    pub fn from_ring_steps(steps: usize) -> Displacement {
        match steps % 8 {
            0 => Displacement::Unmoved,
            4 => Displacement::Opposite,
            s if s.min(8 - s) <= 2 => Displacement::Small,
            _ => Displacement::Large,
        }
    }
}

/// The full plate for one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub cycle: Cycle,
    pub hour: SexagenaryLabel,
    pub ground: Layer,
    pub heaven: Layer,
    /// Ground palace each heaven palace's bundle came from
    pub source: [Palace; 9],
    pub displacement: [Displacement; 9],
    /// Palace of the hour's xun stem on the ground layer
    pub lead_palace: Palace,
    /// Stem that marks the hour on the plate (Jia resolved to its xun stem)
    pub hour_marker: Stem,
    /// Ground palace holding the hour marker
    pub hour_palace: Palace,
    /// Clockwise ring steps applied to the outer palaces
    pub rotation: u8,
    /// The hour marker could not be located and no rotation was applied
    pub degraded: bool,
}

impl Plate {
    pub fn displacement_at(&self, palace: Palace) -> Displacement {
        self.displacement[palace.index()]
    }

    /// Displacement of the outer ring as a whole
    pub fn overall_displacement(&self) -> Displacement {
        Displacement::from_ring_steps(self.rotation as usize)
    }

    pub fn source_of(&self, palace: Palace) -> Palace {
        self.source[palace.index()]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displacement_classes() {
        assert_eq!(Displacement::from_ring_steps(0), Displacement::Unmoved);
        assert_eq!(Displacement::from_ring_steps(4), Displacement::Opposite);
        assert_eq!(Displacement::from_ring_steps(1), Displacement::Small);
        assert_eq!(Displacement::from_ring_steps(7), Displacement::Small);
        assert_eq!(Displacement::from_ring_steps(2), Displacement::Small);
        assert_eq!(Displacement::from_ring_steps(3), Displacement::Large);
        assert_eq!(Displacement::from_ring_steps(5), Displacement::Large);
    }

    #[test]
    fn test_center_bundle_markers() {
        let bundle = PalaceBundle {
            stem: Stem::Wu,
            star: Star::Qin,
            door: None,
            guardian: None,
        };
        assert_eq!(bundle.markers().len(), 2);
        assert!(bundle.holds(Marker::Star(Star::Qin)));
        assert!(!bundle.holds(Marker::Door(Door::Death)));
    }

    #[test]
    fn test_marker_serializes_with_family_tag() {
        let json = serde_json::to_string(&Marker::Door(Door::Open)).unwrap();
        assert_eq!(json, r#"{"family":"door","symbol":"Open"}"#);
    }
}
