//! Core modules for the Qimen engine

pub mod ephemeris;
pub mod calendar;
pub mod epoch;
pub mod plate;
pub mod patterns;
pub mod intent;
pub mod strength;
pub mod outcome;
pub mod engine;

pub use calendar::{CalendarConverter, CalendarReading};
pub use epoch::{EpochResolver, JU_TABLE};
pub use plate::{PlateBuilder, Rotation};
pub use patterns::{PatternAnalyzer, DEFAULT_RULES};
pub use intent::{select_subjects, IntentClassifier};
pub use strength::{find_marker, StrengthEvaluator};
pub use outcome::OutcomeSynthesizer;
pub use engine::{cache_key, EngineContext, QimenEngine};
