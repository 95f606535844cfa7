//! Calendar inputs and derived sexagenary / solar-term labels

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{Branch, Element, EngineError, EngineResult, Stem};
use crate::{MAX_YEAR, MIN_YEAR};

/// Accepted textual layouts for a civil moment
const MOMENT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// =============================================================================
// CALENDAR MOMENT
// =============================================================================

/// Civil date-time of the question, with optional observer longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarMoment {
    /// Civil (wall clock) time at the configured UTC offset
    pub civil: NaiveDateTime,
    /// Degrees east, used for local solar time correction
    pub longitude: Option<f64>,
}

impl CalendarMoment {
    /// Validate and build a moment
    pub fn new(civil: NaiveDateTime, longitude: Option<f64>) -> EngineResult<Self> {
        let year = civil.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(EngineError::InvalidMoment(format!(
                "year {} outside supported range {}-{}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
        if let Some(lon) = longitude {
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err(EngineError::InvalidLongitude(lon));
            }
        }
        Ok(Self { civil, longitude })
    }

    /// Parse `YYYY-MM-DDTHH:MM[:SS]` (a space separator is accepted too)
    pub fn parse(text: &str, longitude: Option<f64>) -> EngineResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::InvalidMoment("missing date-time".to_string()));
        }
        let civil = MOMENT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .ok_or_else(|| EngineError::InvalidMoment(format!("unrecognised date-time '{}'", text)))?;
        Self::new(civil, longitude)
    }
}

// =============================================================================
// SEXAGENARY LABEL
// =============================================================================

/// A stem/branch pair from the sixty-cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SexagenaryLabel {
    pub stem: Stem,
    pub branch: Branch,
}

impl SexagenaryLabel {
    /// Label at position `index` of the sixty-cycle (wraps)
    pub fn from_index(index: i64) -> Self {
        let i = index.rem_euclid(60) as usize;
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Position in the sixty-cycle (0 = JiaZi)
    pub fn index(&self) -> usize {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }

    /// First label of this label's ten-day "xun"
    pub fn xun_leader(&self) -> SexagenaryLabel {
        Self::from_index((self.index() - self.stem.index()) as i64)
    }

    /// Stem (Wu to Gui) hiding the xun leader's Jia on the plate
    pub fn hidden_stem(&self) -> Stem {
        Stem::from_index(4 + self.index() / 10)
    }

    /// Stem used to mark this label on the plate: Jia hides under its xun stem
    pub fn plate_stem(&self) -> Stem {
        if self.stem == Stem::Jia {
            self.hidden_stem()
        } else {
            self.stem
        }
    }

    /// The two branches left without a stem in this xun
    pub fn void_branches(&self) -> [Branch; 2] {
        let lead = self.xun_leader().branch.index();
        [Branch::from_index(lead + 10), Branch::from_index(lead + 11)]
    }

    pub fn hanzi(&self) -> String {
        format!("{}{}", self.stem.hanzi(), self.branch.hanzi())
    }
}

impl std::fmt::Display for SexagenaryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// Month pillar with its civil-month approximation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPillar {
    /// Pillar implied by the civil month alone
    pub naive: SexagenaryLabel,
    /// Pillar bounded by the solar-term crossing
    pub resolved: SexagenaryLabel,
    /// The moment is past this civil month's term crossing, so the next pillar applies
    pub past_term_crossing: bool,
}

/// Year, month, day and hour pillars of a moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: SexagenaryLabel,
    pub month: MonthPillar,
    pub day: SexagenaryLabel,
    pub hour: SexagenaryLabel,
}

impl FourPillars {
    /// Void branches of the day's xun
    pub fn day_void(&self) -> [Branch; 2] {
        self.day.void_branches()
    }

    /// Void branches of the hour's xun
    pub fn hour_void(&self) -> [Branch; 2] {
        self.hour.void_branches()
    }
}

// =============================================================================
// SOLAR TERMS
// =============================================================================

/// Solar term names starting from the winter solstice (pinyin, hanzi)
const TERM_NAMES: [(&str, &str); 24] = [
    ("Dongzhi", "冬至"),
    ("Xiaohan", "小寒"),
    ("Dahan", "大寒"),
    ("Lichun", "立春"),
    ("Yushui", "雨水"),
    ("Jingzhe", "惊蛰"),
    ("Chunfen", "春分"),
    ("Qingming", "清明"),
    ("Guyu", "谷雨"),
    ("Lixia", "立夏"),
    ("Xiaoman", "小满"),
    ("Mangzhong", "芒种"),
    ("Xiazhi", "夏至"),
    ("Xiaoshu", "小暑"),
    ("Dashu", "大暑"),
    ("Liqiu", "立秋"),
    ("Chushu", "处暑"),
    ("Bailu", "白露"),
    ("Qiufen", "秋分"),
    ("Hanlu", "寒露"),
    ("Shuangjiang", "霜降"),
    ("Lidong", "立冬"),
    ("Xiaoxue", "小雪"),
    ("Daxue", "大雪"),
];

/// Dominant element of each term's season; earth rules the last term of each season
const TERM_SEASON: [Element; 24] = [
    Element::Water,
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Wood,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Fire,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Metal,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
    Element::Water,
    Element::Water,
];

/// One of 24 solar terms; index 0 is the winter solstice at 270°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolarTerm(u8);

impl SolarTerm {
    pub const WINTER_SOLSTICE: SolarTerm = SolarTerm(0);
    pub const SUMMER_SOLSTICE: SolarTerm = SolarTerm(12);

    pub fn new(index: usize) -> Option<SolarTerm> {
        (index < 24).then_some(SolarTerm(index as u8))
    }

    /// Term whose checkpoint is the last one at or below `longitude_deg`
    pub fn containing(longitude_deg: f64) -> SolarTerm {
        let offset = (longitude_deg - 270.0).rem_euclid(360.0);
        SolarTerm(((offset / 15.0).floor() as u8) % 24)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn previous(self) -> SolarTerm {
        SolarTerm((self.0 + 23) % 24)
    }

    /// Ecliptic longitude of the checkpoint in degrees
    pub fn longitude(self) -> f64 {
        (270.0 + 15.0 * self.0 as f64) % 360.0
    }

    /// Dongzhi through Mangzhong: the half of the year when light grows
    pub fn is_waxing(self) -> bool {
        self.0 < 12
    }

    pub fn season_element(self) -> Element {
        TERM_SEASON[self.index()]
    }

    pub fn name(self) -> &'static str {
        TERM_NAMES[self.index()].0
    }

    pub fn hanzi(self) -> &'static str {
        TERM_NAMES[self.index()].1
    }
}

impl std::fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sub-period of a solar term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Yuan {
    Upper = 1,
    Middle = 2,
    Lower = 3,
}

impl Yuan {
    /// Yuan governed by the branch of a window's leading Jia/Ji day
    pub fn from_head_branch(branch: Branch) -> Yuan {
        match branch {
            Branch::Zi | Branch::Wu | Branch::Mao | Branch::You => Yuan::Upper,
            Branch::Yin | Branch::Shen | Branch::Si | Branch::Hai => Yuan::Middle,
            Branch::Chen | Branch::Xu | Branch::Chou | Branch::Wei => Yuan::Lower,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Solar term in effect at a moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarTermState {
    pub term: SolarTerm,
    /// Julian day (UT) of the term's crossing
    pub crossing_jd: f64,
    /// Crossing instant as civil time
    pub crossing: NaiveDateTime,
    pub yuan: Yuan,
    /// Root finder stopped at its iteration cap
    pub approximate: bool,
    pub iterations: u8,
    /// Apparent solar longitude at the moment
    pub longitude: f64,
}

// =============================================================================
// TESTS
// =============================================================================
