//! Core types for the Qimen engine

mod symbols;
mod calendar;
mod cycle;
mod plate;
mod pattern;
mod subject;
mod outcome;
mod reason;
mod error;
mod config;
mod reading;

pub use symbols::{Element, PhaseRelation, Stem, Branch, Palace, Star, Door, Guardian};
pub use calendar::{CalendarMoment, SexagenaryLabel, MonthPillar, FourPillars, SolarTerm, SolarTermState, Yuan};
pub use cycle::{Cycle, Direction};
pub use plate::{Marker, PalaceBundle, LayerKind, Layer, Displacement, Plate};
pub use pattern::{Polarity, RulePredicate, PatternRule, PatternMatch};
pub use subject::{Intent, Gender, Profile, Subject, SeasonalState, StrengthScore, SubjectScores};
pub use outcome::{TimingBucket, FactorSource, Factor, Outcome};
pub use reason::{ReasonCode, Advisory};
pub use error::{EngineError, EngineResult};
pub use config::EngineConfig;
pub use reading::{ReadingRequest, Reading};
