//! Integration tests for the full reading pipeline
//!
//! Reference scenario: 2024-06-21T12:00 (+8), "career opportunity".
//! Xiazhi middle yuan, yin dun ju 3, JiaWu hour hiding under Xin.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use qimen::core::{EngineContext, QimenEngine};
use qimen::types::{
    CalendarMoment, Direction, EngineConfig, EngineError, Gender, Intent, Marker, Palace,
    Profile, Reading, ReadingRequest, ReasonCode, Stem, TimingBucket,
};

fn read(query: &str) -> Reading {
    let context = EngineContext::new(EngineConfig::default()).unwrap();
    let moment = CalendarMoment::parse("2024-06-21T12:00", None).unwrap();
    QimenEngine::new(&context)
        .read(&ReadingRequest::new(moment, query))
        .unwrap()
}

#[test]
fn test_career_scenario_cycle() {
    let reading = read("career opportunity");
    assert_eq!(reading.solar_term.term.name(), "Xiazhi");
    assert_eq!(reading.solar_term.yuan.number(), 2);
    assert_eq!(reading.cycle.ju, 3);
    assert_eq!(reading.cycle.direction, Direction::Descending);
    assert_eq!(reading.plate.lead_palace, Palace::Li);
    assert_eq!(reading.plate.hour_marker, Stem::Xin);
    assert!(!reading.degraded);
    assert!(reading.advisories.is_empty());
}

#[test]
fn test_career_scenario_subjects() {
    let reading = read("career opportunity");
    assert_eq!(reading.subjects.intent, Intent::Career);

    let totals: Vec<(&str, i32)> = reading
        .subjects
        .scores
        .iter()
        .map(|s| (s.subject.as_str(), s.total))
        .collect();
    assert_eq!(
        totals,
        vec![("self", 33), ("matter", -33), ("career", -6), ("authority", 37)]
    );
    // mean 7.75 → (7.75 + 33) / 75
    assert!((reading.subjects.favorability - 54.333).abs() < 0.01);
}

#[test]
fn test_career_scenario_outcome() {
    let reading = read("career opportunity");
    assert_eq!(reading.matches.len(), 9);
    assert_eq!(reading.outcome.pattern_sum, -66);
    // 50 + 0.6 * -50 + 0.8 * 4.33
    assert_eq!(reading.outcome.probability, 23);
    assert_eq!(reading.outcome.timing, TimingBucket::Distant);
    // five patterns then four subjects
    assert_eq!(reading.outcome.factors.len(), 9);
}

#[test]
fn test_reading_is_deterministic() {
    let a = read("career opportunity");
    let b = read("career opportunity");
    assert_eq!(a.cache_key, b.cache_key);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_reading_json_round_trip() {
    let reading = read("career opportunity");
    let json = serde_json::to_string_pretty(&reading).unwrap();
    let back: Reading = serde_json::from_str(&json).unwrap();
    assert_eq!(back.plate, reading.plate);
    assert_eq!(back.matches, reading.matches);
    assert_eq!(back.outcome.probability, reading.outcome.probability);
    assert!(json.contains(r#""family": "door""#));
}

#[test]
fn test_relationship_with_profile() {
    let context = EngineContext::new(EngineConfig::default()).unwrap();
    let moment = CalendarMoment::parse("2024-06-21T12:00", None).unwrap();
    let request = ReadingRequest::new(moment, "will my marriage last").with_profile(Profile {
        gender: Some(Gender::Female),
        reference_date: NaiveDate::from_ymd_opt(1990, 8, 15),
    });
    let reading = QimenEngine::new(&context).read(&request).unwrap();

    assert_eq!(reading.subjects.intent, Intent::Relationship);
    let partner = reading.subjects.get("partner").unwrap();
    assert_eq!(partner.marker, Marker::Stem(Stem::Geng));
    assert_eq!(partner.palace, Some(Palace::Kan));
    assert!(reading.subjects.get("natal").is_some());
}

#[test]
fn test_empty_query_aborts() {
    let context = EngineContext::new(EngineConfig::default()).unwrap();
    let moment = CalendarMoment::parse("2024-06-21T12:00", None).unwrap();
    let err = QimenEngine::new(&context)
        .read(&ReadingRequest::new(moment, ""))
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyQuery));
}

#[test]
fn test_deserialized_request_is_revalidated() {
    let context = EngineContext::new(EngineConfig::default()).unwrap();
    let json = r#"{"moment":{"civil":"1700-01-01T00:00:00","longitude":null},"query":"career"}"#;
    let request: ReadingRequest = serde_json::from_str(json).unwrap();
    let err = QimenEngine::new(&context).read(&request).unwrap_err();
    assert!(matches!(err, EngineError::InvalidMoment(_)));
}

#[test]
fn test_custom_rules_drive_outcome() {
    let context = EngineContext::with_rules(EngineConfig::default(), Vec::new()).unwrap();
    let moment = CalendarMoment::parse("2024-06-21T12:00", None).unwrap();
    let reading = QimenEngine::new(&context)
        .read(&ReadingRequest::new(moment, "career opportunity"))
        .unwrap();
    assert!(reading.matches.is_empty());
    // 50 + 0.8 * 4.33
    assert_eq!(reading.outcome.probability, 53);
    assert_eq!(reading.outcome.timing, TimingBucket::Later);
}

#[test]
fn test_general_query_scores_querent_and_matter() {
    let reading = read("is the weather nice");
    assert_eq!(reading.subjects.intent, Intent::General);
    let names: Vec<&str> = reading.subjects.scores.iter().map(|s| s.subject.as_str()).collect();
    assert_eq!(names, vec!["self", "matter"]);
    assert!(reading.subjects.scores.iter().all(|s| s.found));
    assert!(reading
        .advisories
        .iter()
        .all(|a| a.code != ReasonCode::R301_SUBJECT_NOT_FOUND));
}

#[test]
fn test_context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<EngineContext>();
    assert_send_sync::<QimenEngine<'static>>();
}

#[test]
fn test_shared_context_across_threads() {
    let context = EngineContext::new(EngineConfig::default()).unwrap();
    let moment = CalendarMoment::parse("2024-06-21T12:00", None).unwrap();
    let request = ReadingRequest::new(moment, "career opportunity");

    let readings: Vec<Reading> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| QimenEngine::new(&context).read(&request).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let expected = read("career opportunity");
    for reading in &readings {
        assert_eq!(reading, &expected);
    }
}
