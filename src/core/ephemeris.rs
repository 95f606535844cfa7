//! Ephemeris: Julian days, apparent solar longitude and solar-term crossings
//!
//! Low-order solar series (mean longitude, equation of centre, nutation and
//! aberration through the lunar node). Good to roughly 0.01° over 1900-2100,
//! i.e. a quarter hour on a term crossing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::types::SolarTerm;
use crate::{
    MEAN_EQUINOX_J2000, MEAN_SOLAR_RATE, ORBIT_ECCENTRICITY, SOLVER_MAX_ITERATIONS,
    SOLVER_TOLERANCE_DEG, TROPICAL_YEAR_DAYS,
};

/// JD of 2000-01-01 12:00 TT
const J2000: f64 = 2_451_545.0;

/// JD of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// num_days_from_ce() of a date plus this is its Julian day number
const CE_TO_JDN: i64 = 1_721_425;

/// Julian day (UT) of a civil date-time observed at `utc_offset_hours`
pub fn julian_day(civil: NaiveDateTime, utc_offset_hours: f64) -> f64 {
    let secs = civil.and_utc().timestamp() as f64 - utc_offset_hours * 3600.0;
    UNIX_EPOCH_JD + secs / 86_400.0
}

/// Civil date-time at `utc_offset_hours` for a Julian day; `None` if out of range
pub fn civil_from_julian_day(jd: f64, utc_offset_hours: f64) -> Option<NaiveDateTime> {
    let secs = (jd - UNIX_EPOCH_JD) * 86_400.0 + utc_offset_hours * 3600.0;
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp(secs.round() as i64, 0).map(|dt| dt.naive_utc())
}

/// Julian day number of a civil date (noon-based integer day)
pub fn julian_day_number(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + CE_TO_JDN
}

fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Mean anomaly of the sun in radians
fn mean_anomaly(t: f64) -> f64 {
    (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians()
}

/// Apparent geocentric ecliptic longitude of the sun, degrees in [0, 360)
pub fn apparent_solar_longitude(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = mean_anomaly(t);
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    (l0 + c - 0.005_69 - 0.004_78 * omega.sin()).rem_euclid(360.0)
}

/// Instantaneous apparent motion of the sun in degrees/day
pub fn solar_longitude_rate(jd: f64) -> f64 {
    let m = mean_anomaly(centuries_since_j2000(jd));
    MEAN_SOLAR_RATE * (1.0 + 2.0 * ORBIT_ECCENTRICITY * m.cos())
}

/// Angle folded into (-180, 180]
pub fn signed_angle(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Historical-average estimate of when the sun reaches `target_deg`,
/// taken in the year window centred on `near_jd`
pub fn seed_estimate(target_deg: f64, near_jd: f64) -> f64 {
    let years = ((near_jd - MEAN_EQUINOX_J2000) / TROPICAL_YEAR_DAYS).floor();
    let fraction = target_deg.rem_euclid(360.0) / 360.0;
    let mut seed = MEAN_EQUINOX_J2000 + (years + fraction) * TROPICAL_YEAR_DAYS;
    let half_year = TROPICAL_YEAR_DAYS / 2.0;
    if seed - near_jd > half_year {
        seed -= TROPICAL_YEAR_DAYS;
    } else if near_jd - seed > half_year {
        seed += TROPICAL_YEAR_DAYS;
    }
    seed
}

/// Result of refining a term crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub jd: f64,
    pub iterations: u8,
    /// |angular error| at `jd` in degrees
    pub residual_deg: f64,
    /// Iteration cap reached (or the inputs were unusable)
    pub approximate: bool,
}

/// Refine the moment the sun crosses `target_deg` starting from `seed_jd`
pub fn solve_crossing(target_deg: f64, seed_jd: f64) -> Crossing {
    solve_crossing_with(apparent_solar_longitude, solar_longitude_rate, target_deg, seed_jd)
}

/// Newton-style refinement over arbitrary longitude and rate functions.
///
/// Never fails: when the error stays above tolerance after the cap, the best
/// estimate seen is returned flagged approximate.
pub fn solve_crossing_with<L, R>(longitude: L, rate: R, target_deg: f64, seed_jd: f64) -> Crossing
where
    L: Fn(f64) -> f64,
    R: Fn(f64) -> f64,
{
    let mut jd = seed_jd;
    let mut best = Crossing {
        jd: seed_jd,
        iterations: 0,
        residual_deg: f64::INFINITY,
        approximate: true,
    };

    for iteration in 1..=SOLVER_MAX_ITERATIONS {
        let error = signed_angle(target_deg - longitude(jd));
        if !error.is_finite() {
            break;
        }
        if error.abs() < best.residual_deg {
            best = Crossing {
                jd,
                iterations: iteration,
                residual_deg: error.abs(),
                approximate: true,
            };
        }
        if error.abs() < SOLVER_TOLERANCE_DEG {
            return Crossing {
                jd,
                iterations: iteration,
                residual_deg: error.abs(),
                approximate: false,
            };
        }
        let speed = rate(jd);
        if !speed.is_finite() || speed.abs() < 1e-9 {
            break;
        }
        jd += error / speed;
        best.iterations = iteration;
    }

    warn!(
        target_deg,
        residual_deg = best.residual_deg,
        "solar term solver did not converge"
    );
    best
}

/// Term in effect at `jd` and the crossing that opened it.
///
/// The crossing is the closest one not after `jd`.
pub fn term_at(jd: f64) -> (SolarTerm, Crossing) {
    let longitude = apparent_solar_longitude(jd);
    let mut term = SolarTerm::containing(longitude);
    let mut crossing = solve_crossing(term.longitude(), seed_estimate(term.longitude(), jd));

    if crossing.jd > jd {
        if signed_angle(longitude - term.longitude()) >= 0.0 {
            // Sun already past the checkpoint; the root sits within solver tolerance after jd
            crossing.jd = jd;
        } else {
            term = term.previous();
            crossing = solve_crossing(term.longitude(), seed_estimate(term.longitude(), jd));
        }
    }

    debug!(
        term = term.name(),
        longitude,
        crossing_jd = crossing.jd,
        iterations = crossing.iterations,
        "solar term resolved"
    );
    (term, crossing)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn test_j2000_julian_day() {
        assert!((julian_day(at("2000-01-01T12:00"), 0.0) - J2000).abs() < 1e-9);
        assert!((julian_day(at("2000-01-01T20:00"), 8.0) - J2000).abs() < 1e-9);
    }

    #[test]
    fn test_julian_day_number() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(julian_day_number(date), 2_451_545);
    }

    #[test]
    fn test_civil_round_trip() {
        let civil = at("2024-06-21T12:00");
        let jd = julian_day(civil, 8.0);
        assert_eq!(civil_from_julian_day(jd, 8.0), Some(civil));
    }

    #[test]
    fn test_longitude_near_solstice() {
        // June solstice 2024 fell at 20:51 UTC on June 20
        let before = julian_day(at("2024-06-20T20:00"), 0.0);
        let after = julian_day(at("2024-06-20T22:00"), 0.0);
        assert!(apparent_solar_longitude(before) < 90.0);
        assert!(apparent_solar_longitude(after) > 90.0);
    }

    #[test]
    fn test_rate_tracks_eccentricity() {
        // Faster near perihelion (early January) than aphelion (early July)
        let january = solar_longitude_rate(julian_day(at("2024-01-03T00:00"), 0.0));
        let july = solar_longitude_rate(julian_day(at("2024-07-05T00:00"), 0.0));
        assert!(january > 1.0 && january < 1.03);
        assert!(july < 0.96 && july > 0.94);
    }

    #[test]
    fn test_signed_angle_folds() {
        assert_eq!(signed_angle(190.0), -170.0);
        assert_eq!(signed_angle(-10.0), -10.0);
        assert_eq!(signed_angle(180.0), 180.0);
        assert_eq!(signed_angle(360.0), 0.0);
    }

    #[test]
    fn test_solver_converges_on_solstice() {
        let seed = seed_estimate(90.0, julian_day(at("2024-06-01T00:00"), 0.0));
        let crossing = solve_crossing(90.0, seed);
        assert!(!crossing.approximate);
        assert!(crossing.iterations <= SOLVER_MAX_ITERATIONS);
        let civil = civil_from_julian_day(crossing.jd, 0.0).unwrap();
        let expected = at("2024-06-20T20:51");
        assert!((civil - expected).num_minutes().abs() <= 30, "got {}", civil);
    }

    #[test]
    fn test_solver_caps_on_frozen_longitude() {
        // A sun that never moves can never reach the target
        let crossing = solve_crossing_with(|_| 10.0, |_| MEAN_SOLAR_RATE, 90.0, 2_460_000.0);
        assert!(crossing.approximate);
        assert_eq!(crossing.iterations, SOLVER_MAX_ITERATIONS);
        assert!(crossing.jd.is_finite());
    }

    #[test]
    fn test_solver_survives_nan() {
        let crossing = solve_crossing_with(|_| f64::NAN, |_| 1.0, 90.0, 2_460_000.0);
        assert!(crossing.approximate);
        assert_eq!(crossing.jd, 2_460_000.0);
    }

    #[test]
    fn test_term_at_is_not_after_moment() {
        let jd = julian_day(at("2024-06-21T12:00"), 8.0);
        let (term, crossing) = term_at(jd);
        assert_eq!(term, SolarTerm::SUMMER_SOLSTICE);
        assert!(crossing.jd <= jd);
        assert!(jd - crossing.jd < 1.0);
    }

    #[test]
    fn test_term_at_seconds_around_crossing() {
        // Qingming (15°) of 1950; the solver root may land a few seconds either side
        let near = julian_day(at("1950-04-05T00:00"), 8.0);
        let root = solve_crossing(15.0, seed_estimate(15.0, near)).jd;
        let qingming = SolarTerm::containing(15.0);
        for second in -120..=120 {
            let jd = root + second as f64 / 86_400.0;
            let (term, crossing) = term_at(jd);
            assert!(crossing.jd <= jd, "crossing after moment at {}s", second);
            if signed_angle(apparent_solar_longitude(jd) - 15.0) >= 0.0 {
                assert_eq!(term, qingming, "at {}s", second);
            } else {
                assert_eq!(term, qingming.previous(), "at {}s", second);
            }
        }
    }

    #[test]
    fn test_term_at_early_january() {
        // Xiaohan falls around January 5-6; January 2 is still Dongzhi
        let jd = julian_day(at("2025-01-02T12:00"), 8.0);
        let (term, crossing) = term_at(jd);
        assert_eq!(term, SolarTerm::WINTER_SOLSTICE);
        assert!(jd - crossing.jd > 5.0 && jd - crossing.jd < 15.0);
    }
}
