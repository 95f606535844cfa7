//! Ju (cycle number) and walking direction

use serde::{Deserialize, Serialize};

/// Direction the plate walks: ascending (yang dun) or descending (yin dun)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// +1 for ascending, -1 for descending
    pub fn step(self) -> i64 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Direction::Ascending
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Ascending => "YANG",
            Direction::Descending => "YIN",
        };
        write!(f, "{}", name)
    }
}

/// Cycle governing marker placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cycle {
    /// Ju number, always 1-9
    pub ju: u8,
    pub direction: Direction,
}

impl Cycle {
    /// Checked constructor; `None` when `ju` is outside 1-9
    pub fn new(ju: u8, direction: Direction) -> Option<Cycle> {
        (1..=9).contains(&ju).then_some(Cycle { ju, direction })
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.direction, self.ju)
    }
}
