//! Calendar converter: civil moment → four pillars + solar-term state
//!
//! Year and day pillars are modular counts from fixed epochs; the month pillar
//! follows solar longitude, and the yuan follows the day's five-day window.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::core::ephemeris::{
    apparent_solar_longitude, civil_from_julian_day, julian_day, julian_day_number, term_at,
};
use crate::types::{
    Advisory, Branch, CalendarMoment, EngineConfig, FourPillars, MonthPillar, ReasonCode,
    SexagenaryLabel, SolarTermState, Stem, Yuan,
};

/// Sixty-cycle offset of the Julian day number
const DAY_EPOCH_OFFSET: i64 = 49;

/// 4 CE was a JiaZi year
const YEAR_EPOCH: i64 = 4;

/// Ecliptic longitude of Lichun, where the solar year and the Yin month begin
const LICHUN_DEG: f64 = 315.0;

/// Hour from which the day pillar already belongs to the next day
const LATE_ZI_HOUR: u32 = 23;

/// Output of the converter
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarReading {
    pub pillars: FourPillars,
    pub solar_term: SolarTermState,
    /// Julian day (UT) of the moment
    pub jd: f64,
    pub advisories: Vec<Advisory>,
}

/// Converts civil moments using one engine config
#[derive(Debug, Clone)]
pub struct CalendarConverter {
    utc_offset_hours: f64,
    solar_time: bool,
    zone_meridian: f64,
}

impl Default for CalendarConverter {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CalendarConverter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            utc_offset_hours: config.utc_offset_hours,
            solar_time: config.solar_time,
            zone_meridian: config.zone_meridian(),
        }
    }

    /// Full conversion of a moment
    pub fn convert(&self, moment: &CalendarMoment) -> CalendarReading {
        let jd = julian_day(moment.civil, self.utc_offset_hours);
        let longitude = apparent_solar_longitude(jd);
        let local = self.local_time(moment);

        let year = self.year_pillar(moment.civil, longitude);
        let month = month_pillar(moment.civil.month(), year.stem, longitude);
        let day = day_pillar(local);
        let hour = hour_pillar(local.hour(), day.stem);

        let (term, crossing) = term_at(jd);
        let mut advisories = Vec::new();
        if crossing.approximate {
            advisories.push(Advisory::new(
                ReasonCode::R101_TERM_APPROXIMATE,
                format!(
                    "{} residual {:.6}° after {} iterations",
                    term.name(),
                    crossing.residual_deg,
                    crossing.iterations
                ),
            ));
        }

        let solar_term = SolarTermState {
            term,
            crossing_jd: crossing.jd,
            crossing: civil_from_julian_day(crossing.jd, self.utc_offset_hours)
                .unwrap_or(moment.civil),
            yuan: yuan_for_day(day),
            approximate: crossing.approximate,
            iterations: crossing.iterations,
            longitude,
        };

        let pillars = FourPillars {
            year,
            month,
            day,
            hour,
        };

        debug!(
            year = %pillars.year,
            month = %pillars.month.resolved,
            day = %pillars.day,
            hour = %pillars.hour,
            term = term.name(),
            yuan = solar_term.yuan.number(),
            "calendar converted"
        );

        CalendarReading {
            pillars,
            solar_term,
            jd,
            advisories,
        }
    }

    /// Year pillar of a civil date, taken at local noon
    pub fn year_pillar_for_date(&self, date: NaiveDate) -> SexagenaryLabel {
        let civil = date.and_time(NaiveTime::MIN) + Duration::hours(12);
        let longitude = apparent_solar_longitude(julian_day(civil, self.utc_offset_hours));
        self.year_pillar(civil, longitude)
    }

    /// Year pillar; January/February moments before Lichun belong to the previous year
    fn year_pillar(&self, civil: NaiveDateTime, longitude: f64) -> SexagenaryLabel {
        let mut year = civil.year() as i64;
        if civil.month() <= 2 && (270.0..LICHUN_DEG).contains(&longitude) {
            year -= 1;
        }
        SexagenaryLabel::from_index(year - YEAR_EPOCH)
    }

    /// Moment shifted to local mean solar time when a longitude is known
    fn local_time(&self, moment: &CalendarMoment) -> NaiveDateTime {
        match moment.longitude {
            Some(lon) if self.solar_time => {
                let minutes = ((lon - self.zone_meridian) * 4.0).round() as i64;
                moment.civil + Duration::minutes(minutes)
            }
            _ => moment.civil,
        }
    }
}

/// Day pillar; from 23:00 the next day's pillar applies
pub fn day_pillar(local: NaiveDateTime) -> SexagenaryLabel {
    let mut jdn = julian_day_number(local.date());
    if local.hour() >= LATE_ZI_HOUR {
        jdn += 1;
    }
    SexagenaryLabel::from_index(jdn + DAY_EPOCH_OFFSET)
}

/// Hour pillar by the five-rat rule
pub fn hour_pillar(hour: u32, day_stem: Stem) -> SexagenaryLabel {
    let branch = Branch::from_index(((hour + 1) / 2) as usize);
    let stem = Stem::from_index((day_stem.index() % 5) * 2 + branch.index());
    SexagenaryLabel { stem, branch }
}

/// Month stem by the five-tiger rule
fn month_label(year_stem: Stem, branch: Branch) -> SexagenaryLabel {
    let yin_stem = (year_stem.index() % 5) * 2 + 2;
    let months_after_yin = (branch.index() + 10) % 12;
    SexagenaryLabel {
        stem: Stem::from_index(yin_stem + months_after_yin),
        branch,
    }
}

/// Month pillar: naive from the civil month, resolved from solar longitude
pub fn month_pillar(civil_month: u32, year_stem: Stem, longitude: f64) -> MonthPillar {
    // Civil month m opens in the pillar whose branch is m - 1 (January → Zi)
    let naive = month_label(year_stem, Branch::from_index((civil_month as usize + 11) % 12));
    let months_since_lichun = ((longitude - LICHUN_DEG).rem_euclid(360.0) / 30.0).floor() as usize;
    let resolved = month_label(year_stem, Branch::from_index(months_since_lichun + 2));
    MonthPillar {
        naive,
        resolved,
        past_term_crossing: naive.branch != resolved.branch,
    }
}

/// Yuan from the Jia or Ji day heading the day's five-day window
pub fn yuan_for_day(day: SexagenaryLabel) -> Yuan {
    let head = day.index() as i64 - (day.stem.index() % 5) as i64;
    Yuan::from_head_branch(SexagenaryLabel::from_index(head).branch)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(text: &str) -> CalendarMoment {
        CalendarMoment::parse(text, None).unwrap()
    }

    #[test]
    fn test_known_day_pillars() {
        // 2000-01-01 was WuWu, 2024-02-10 was JiaChen
        let a = day_pillar(moment("2000-01-01T12:00").civil);
        assert_eq!((a.stem, a.branch), (Stem::Wu, Branch::Wu));
        let b = day_pillar(moment("2024-02-10T12:00").civil);
        assert_eq!((b.stem, b.branch), (Stem::Jia, Branch::Chen));
    }

    #[test]
    fn test_late_zi_hour_advances_day() {
        let before = day_pillar(moment("2024-06-21T22:59").civil);
        let after = day_pillar(moment("2024-06-21T23:00").civil);
        assert_eq!(after.index(), (before.index() + 1) % 60);
    }

    #[test]
    fn test_five_rat_rule() {
        // Jia day opens with JiaZi, Yi day with BingZi
        assert_eq!(hour_pillar(0, Stem::Jia).index(), 0);
        assert_eq!(hour_pillar(0, Stem::Yi).stem, Stem::Bing);
        assert_eq!(hour_pillar(23, Stem::Jia).branch, Branch::Zi);
        assert_eq!(hour_pillar(12, Stem::Bing).index(), 30);
    }

    #[test]
    fn test_year_turns_at_lichun() {
        let converter = CalendarConverter::default();
        let before = converter.convert(&moment("2024-02-03T12:00"));
        let after = converter.convert(&moment("2024-02-05T12:00"));
        assert_eq!((before.pillars.year.stem, before.pillars.year.branch), (Stem::Gui, Branch::Mao));
        assert_eq!((after.pillars.year.stem, after.pillars.year.branch), (Stem::Jia, Branch::Chen));
    }

    #[test]
    fn test_month_pillar_after_mangzhong() {
        let converter = CalendarConverter::default();
        let reading = converter.convert(&moment("2024-06-21T12:00"));
        let month = reading.pillars.month;
        assert_eq!(month.naive.branch, Branch::Si);
        assert_eq!((month.resolved.stem, month.resolved.branch), (Stem::Geng, Branch::Wu));
        assert!(month.past_term_crossing);
    }

    #[test]
    fn test_month_pillar_before_crossing_keeps_naive() {
        let converter = CalendarConverter::default();
        let reading = converter.convert(&moment("2024-06-02T12:00"));
        assert!(!reading.pillars.month.past_term_crossing);
        assert_eq!(reading.pillars.month.resolved, reading.pillars.month.naive);
    }

    #[test]
    fn test_yuan_from_window_head() {
        // BingChen heads back to JiaYin: middle yuan
        assert_eq!(yuan_for_day(SexagenaryLabel::from_index(52)), Yuan::Middle);
        // JiaZi heads itself: upper yuan
        assert_eq!(yuan_for_day(SexagenaryLabel::from_index(0)), Yuan::Upper);
        // GengChen heads back to JiMao: upper yuan
        assert_eq!(yuan_for_day(SexagenaryLabel::from_index(16)), Yuan::Upper);
    }

    #[test]
    fn test_solar_time_shifts_hour() {
        let config = EngineConfig::default();
        let converter = CalendarConverter::new(&config);
        // 90°E is 120 minutes behind the 120°E zone meridian
        let west = CalendarMoment::parse("2024-06-21T12:30", Some(90.0)).unwrap();
        let reading = converter.convert(&west);
        assert_eq!(reading.pillars.hour.branch, Branch::Si);

        let plain = converter.convert(&moment("2024-06-21T12:30"));
        assert_eq!(plain.pillars.hour.branch, Branch::Wu);
    }

    #[test]
    fn test_scenario_moment() {
        let converter = CalendarConverter::default();
        let reading = converter.convert(&moment("2024-06-21T12:00"));
        assert_eq!(reading.pillars.day.index(), 52);
        assert_eq!(reading.pillars.hour.index(), 30);
        assert_eq!(reading.solar_term.term.name(), "Xiazhi");
        assert_eq!(reading.solar_term.yuan, Yuan::Middle);
        assert!(!reading.solar_term.approximate);
        assert!(reading.advisories.is_empty());
    }
}
