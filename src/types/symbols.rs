//! Symbol families placed on the plate, plus the five-phase cycle they share
//!
//! Every family carries a fixed element so the strength evaluator can relate
//! any marker to any palace or hour.

use serde::{Deserialize, Serialize};

// =============================================================================
// FIVE PHASES
// =============================================================================

/// The five-phase cycle in generating order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// Relation of one element to another, read from the first element's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseRelation {
    Same,
    /// First element feeds the second
    Generates,
    /// Second element feeds the first
    GeneratedBy,
    /// First element controls the second
    Restrains,
    /// Second element controls the first
    RestrainedBy,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Element this one generates (wood → fire → earth → metal → water → wood)
    pub fn generates(self) -> Element {
        Self::ALL[(self.index() + 1) % 5]
    }

    /// Element this one restrains (wood → earth → water → fire → metal → wood)
    pub fn restrains(self) -> Element {
        Self::ALL[(self.index() + 2) % 5]
    }

    /// Relation of `self` towards `other`
    pub fn relation_to(self, other: Element) -> PhaseRelation {
        match (other.index() + 5 - self.index()) % 5 {
            0 => PhaseRelation::Same,
            1 => PhaseRelation::Generates,
            2 => PhaseRelation::Restrains,
            3 => PhaseRelation::RestrainedBy,
            _ => PhaseRelation::GeneratedBy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// STEMS (10)
// =============================================================================

/// Heavenly stems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    /// Stem for any integer index (wraps modulo 10)
    pub fn from_index(index: usize) -> Stem {
        Self::ALL[index % 10]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn element(self) -> Element {
        Element::ALL[self.index() / 2]
    }

    pub fn name(self) -> &'static str {
        ["Jia", "Yi", "Bing", "Ding", "Wu", "Ji", "Geng", "Xin", "Ren", "Gui"][self.index()]
    }

    pub fn hanzi(self) -> &'static str {
        ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"][self.index()]
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// BRANCHES (12)
// =============================================================================

/// Earthly branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    /// Branch for any integer index (wraps modulo 12)
    pub fn from_index(index: usize) -> Branch {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn element(self) -> Element {
        match self {
            Branch::Zi | Branch::Hai => Element::Water,
            Branch::Yin | Branch::Mao => Element::Wood,
            Branch::Si | Branch::Wu => Element::Fire,
            Branch::Shen | Branch::You => Element::Metal,
            Branch::Chou | Branch::Chen | Branch::Wei | Branch::Xu => Element::Earth,
        }
    }

    /// Palace the branch sits in on the compass ring.
    ///
    /// The four corner palaces each hold two branches.
    pub fn palace(self) -> Palace {
        match self {
            Branch::Zi => Palace::Kan,
            Branch::Chou | Branch::Yin => Palace::Gen,
            Branch::Mao => Palace::Zhen,
            Branch::Chen | Branch::Si => Palace::Xun,
            Branch::Wu => Palace::Li,
            Branch::Wei | Branch::Shen => Palace::Kun,
            Branch::You => Palace::Dui,
            Branch::Xu | Branch::Hai => Palace::Qian,
        }
    }

    pub fn name(self) -> &'static str {
        [
            "Zi", "Chou", "Yin", "Mao", "Chen", "Si", "Wu", "Wei", "Shen", "You", "Xu", "Hai",
        ][self.index()]
    }

    pub fn hanzi(self) -> &'static str {
        ["子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥"][self.index()]
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// PALACES (9)
// =============================================================================

/// The nine palaces, numbered in Luo Shu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Palace {
    Kan = 1,
    Kun = 2,
    Zhen = 3,
    Xun = 4,
    Center = 5,
    Qian = 6,
    Dui = 7,
    Gen = 8,
    Li = 9,
}

impl Palace {
    /// All palaces in Luo Shu number order
    pub const ALL: [Palace; 9] = [
        Palace::Kan,
        Palace::Kun,
        Palace::Zhen,
        Palace::Xun,
        Palace::Center,
        Palace::Qian,
        Palace::Dui,
        Palace::Gen,
        Palace::Li,
    ];

    /// The eight outer palaces, clockwise from the north
    pub const RING: [Palace; 8] = [
        Palace::Kan,
        Palace::Gen,
        Palace::Zhen,
        Palace::Xun,
        Palace::Li,
        Palace::Kun,
        Palace::Dui,
        Palace::Qian,
    ];

    /// Display rows, south on top
    pub const GRID: [[Palace; 3]; 3] = [
        [Palace::Xun, Palace::Li, Palace::Kun],
        [Palace::Zhen, Palace::Center, Palace::Dui],
        [Palace::Gen, Palace::Kan, Palace::Qian],
    ];

    pub fn from_number(number: u8) -> Option<Palace> {
        match number {
            1..=9 => Some(Self::ALL[number as usize - 1]),
            _ => None,
        }
    }

    /// Luo Shu number (1-9)
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based slot (0-8)
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn is_center(self) -> bool {
        self == Palace::Center
    }

    /// Position on the outer ring, `None` for the center
    pub fn ring_position(self) -> Option<usize> {
        Self::RING.iter().position(|p| *p == self)
    }

    /// Palace used when the ring needs a position: the center lodges in Kun
    pub fn ring_anchor(self) -> Palace {
        if self.is_center() {
            Palace::Kun
        } else {
            self
        }
    }

    pub fn element(self) -> Element {
        match self {
            Palace::Kan => Element::Water,
            Palace::Zhen | Palace::Xun => Element::Wood,
            Palace::Li => Element::Fire,
            Palace::Qian | Palace::Dui => Element::Metal,
            Palace::Kun | Palace::Center | Palace::Gen => Element::Earth,
        }
    }

    /// Compass direction
    pub fn direction(self) -> &'static str {
        match self {
            Palace::Kan => "N",
            Palace::Kun => "SW",
            Palace::Zhen => "E",
            Palace::Xun => "SE",
            Palace::Center => "C",
            Palace::Qian => "NW",
            Palace::Dui => "W",
            Palace::Gen => "NE",
            Palace::Li => "S",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palace::Kan => "Kan",
            Palace::Kun => "Kun",
            Palace::Zhen => "Zhen",
            Palace::Xun => "Xun",
            Palace::Center => "Center",
            Palace::Qian => "Qian",
            Palace::Dui => "Dui",
            Palace::Gen => "Gen",
            Palace::Li => "Li",
        }
    }
}

impl std::fmt::Display for Palace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name(), self.number())
    }
}

// =============================================================================
// STARS (9)
// =============================================================================

/// The nine stars, in home-palace order (Peng lives in palace 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Star {
    Peng,
    Rui,
    Chong,
    Fu,
    Qin,
    Xin,
    Zhu,
    Ren,
    Ying,
}

impl Star {
    pub const ALL: [Star; 9] = [
        Star::Peng,
        Star::Rui,
        Star::Chong,
        Star::Fu,
        Star::Qin,
        Star::Xin,
        Star::Zhu,
        Star::Ren,
        Star::Ying,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn home(self) -> Palace {
        Palace::ALL[self.index()]
    }

    /// Star whose home is `palace`
    pub fn home_of(palace: Palace) -> Star {
        Self::ALL[palace.index()]
    }

    pub fn element(self) -> Element {
        match self {
            Star::Peng => Element::Water,
            Star::Chong | Star::Fu => Element::Wood,
            Star::Ying => Element::Fire,
            Star::Xin | Star::Zhu => Element::Metal,
            Star::Rui | Star::Qin | Star::Ren => Element::Earth,
        }
    }

    pub fn name(self) -> &'static str {
        ["Peng", "Rui", "Chong", "Fu", "Qin", "Xin", "Zhu", "Ren", "Ying"][self.index()]
    }
}

impl std::fmt::Display for Star {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// DOORS (8)
// =============================================================================

/// The eight doors, in ring order from the north (Rest lives in Kan)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Door {
    Rest,
    Life,
    Harm,
    Delusion,
    Scenery,
    Death,
    Fear,
    Open,
}

impl Door {
    pub const ALL: [Door; 8] = [
        Door::Rest,
        Door::Life,
        Door::Harm,
        Door::Delusion,
        Door::Scenery,
        Door::Death,
        Door::Fear,
        Door::Open,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn home(self) -> Palace {
        Palace::RING[self.index()]
    }

    /// Door whose home is `palace` (the center borrows Kun's door)
    pub fn home_of(palace: Palace) -> Door {
        let position = palace.ring_anchor().ring_position().unwrap_or(5);
        Self::ALL[position]
    }

    pub fn element(self) -> Element {
        match self {
            Door::Rest => Element::Water,
            Door::Harm | Door::Delusion => Element::Wood,
            Door::Scenery => Element::Fire,
            Door::Fear | Door::Open => Element::Metal,
            Door::Life | Door::Death => Element::Earth,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Door::Rest => "Rest",
            Door::Life => "Life",
            Door::Harm => "Harm",
            Door::Delusion => "Delusion",
            Door::Scenery => "Scenery",
            Door::Death => "Death",
            Door::Fear => "Fear",
            Door::Open => "Open",
        }
    }
}

impl std::fmt::Display for Door {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// GUARDIANS (8)
// =============================================================================

/// The eight guardian spirits, in walking order from the Chief
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Guardian {
    Chief,
    Serpent,
    Moon,
    Harmony,
    Tiger,
    Tortoise,
    NineEarth,
    NineHeaven,
}

impl Guardian {
    pub const ALL: [Guardian; 8] = [
        Guardian::Chief,
        Guardian::Serpent,
        Guardian::Moon,
        Guardian::Harmony,
        Guardian::Tiger,
        Guardian::Tortoise,
        Guardian::NineEarth,
        Guardian::NineHeaven,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn element(self) -> Element {
        match self {
            Guardian::Chief | Guardian::NineEarth => Element::Earth,
            Guardian::Serpent => Element::Fire,
            Guardian::Moon | Guardian::Tiger | Guardian::NineHeaven => Element::Metal,
            Guardian::Harmony => Element::Wood,
            Guardian::Tortoise => Element::Water,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Guardian::Chief => "Chief",
            Guardian::Serpent => "Serpent",
            Guardian::Moon => "Moon",
            Guardian::Harmony => "Harmony",
            Guardian::Tiger => "Tiger",
            Guardian::Tortoise => "Tortoise",
            Guardian::NineEarth => "NineEarth",
            Guardian::NineHeaven => "NineHeaven",
        }
    }
}

impl std::fmt::Display for Guardian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
