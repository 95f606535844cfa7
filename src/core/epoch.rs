//! Epoch resolver: solar term + yuan → cycle (ju and direction)
//!
//! The ju table is the traditional chaibu layout keyed by term index from the
//! winter solstice, one column per yuan.

use tracing::{debug, warn};

use crate::types::{Advisory, Cycle, Direction, ReasonCode, SolarTerm, SolarTermState, Yuan};

/// Ju per term (from Dongzhi) and yuan (upper, middle, lower)
pub const JU_TABLE: [[u8; 3]; 24] = [
    [1, 7, 4], // Dongzhi
    [2, 8, 5], // Xiaohan
    [3, 9, 6], // Dahan
    [8, 5, 2], // Lichun
    [9, 6, 3], // Yushui
    [1, 7, 4], // Jingzhe
    [3, 9, 6], // Chunfen
    [4, 1, 7], // Qingming
    [5, 2, 8], // Guyu
    [4, 1, 7], // Lixia
    [5, 2, 8], // Xiaoman
    [6, 3, 9], // Mangzhong
    [9, 3, 6], // Xiazhi
    [8, 2, 5], // Xiaoshu
    [7, 1, 4], // Dashu
    [2, 5, 8], // Liqiu
    [1, 4, 7], // Chushu
    [9, 3, 6], // Bailu
    [7, 1, 4], // Qiufen
    [6, 9, 3], // Hanlu
    [5, 8, 2], // Shuangjiang
    [6, 9, 3], // Lidong
    [5, 8, 2], // Xiaoxue
    [4, 7, 1], // Daxue
];

/// Ju used when the table yields something unusable
const FALLBACK_JU: u8 = 1;

/// Looks cycles up in an immutable ju table
#[derive(Debug, Clone)]
pub struct EpochResolver {
    table: [[u8; 3]; 24],
}

impl Default for EpochResolver {
    fn default() -> Self {
        Self { table: JU_TABLE }
    }
}

impl EpochResolver {
    /// Resolver over a custom table
    pub fn with_table(table: [[u8; 3]; 24]) -> Self {
        Self { table }
    }

    /// Cycle for a solar-term state
    pub fn resolve(&self, state: &SolarTermState) -> (Cycle, Vec<Advisory>) {
        self.resolve_index(state.term.index(), state.yuan)
    }

    /// Cycle for a raw term index.
    ///
    /// Out-of-range indices and ju values are defects: they assert in debug
    /// builds and fall back to the winter solstice / ju 1 otherwise.
    pub fn resolve_index(&self, term_index: usize, yuan: Yuan) -> (Cycle, Vec<Advisory>) {
        let mut advisories = Vec::new();

        debug_assert!(term_index < 24, "term index {} out of range", term_index);
        let term = match SolarTerm::new(term_index) {
            Some(term) => term,
            None => {
                warn!(term_index, "term index out of range, using winter solstice");
                advisories.push(Advisory::new(
                    ReasonCode::R401_TERM_INDEX_FALLBACK,
                    format!("term index {}", term_index),
                ));
                SolarTerm::WINTER_SOLSTICE
            }
        };

        let direction = if term.is_waxing() {
            Direction::Ascending
        } else {
            Direction::Descending
        };

        let ju = self.table[term.index()][yuan.number() as usize - 1];
        debug_assert!((1..=9).contains(&ju), "ju {} out of range", ju);
        let cycle = match Cycle::new(ju, direction) {
            Some(cycle) => cycle,
            None => {
                warn!(ju, term = term.name(), "ju out of range, using ju 1");
                advisories.push(Advisory::new(
                    ReasonCode::R402_JU_FALLBACK,
                    format!("ju {} for {} yuan {}", ju, term.name(), yuan.number()),
                ));
                Cycle {
                    ju: FALLBACK_JU,
                    direction,
                }
            }
        };

        debug!(term = term.name(), yuan = yuan.number(), cycle = %cycle, "cycle resolved");
        (cycle, advisories)
    }
}

// =============================================================================
// TESTS
// =============================================================================
