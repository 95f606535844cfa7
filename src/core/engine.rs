//! Engine facade: one read-only context, one pure pipeline per request
//!
//! moment → pillars + term → cycle → plate → patterns + subject scores → outcome

use chrono::Datelike;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::calendar::CalendarConverter;
use crate::core::epoch::EpochResolver;
use crate::core::intent::{select_subjects, IntentClassifier};
use crate::core::outcome::OutcomeSynthesizer;
use crate::core::patterns::PatternAnalyzer;
use crate::core::plate::PlateBuilder;
use crate::core::strength::StrengthEvaluator;
use crate::types::{
    Advisory, CalendarMoment, EngineConfig, EngineError, EngineResult, PatternRule, Plate,
    Reading, ReadingRequest, ReasonCode, SexagenaryLabel,
};
use crate::{MAX_YEAR, MIN_YEAR};

/// Everything built once at startup and shared read-only between requests
#[derive(Debug, Clone)]
pub struct EngineContext {
    config: EngineConfig,
    converter: CalendarConverter,
    epoch: EpochResolver,
    plates: PlateBuilder,
    analyzer: PatternAnalyzer,
    classifier: IntentClassifier,
    evaluator: StrengthEvaluator,
    synthesizer: OutcomeSynthesizer,
}

impl EngineContext {
    /// Context with the built-in rule table
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_analyzer(config, PatternAnalyzer::default())
    }

    /// Context with a custom rule table
    pub fn with_rules(config: EngineConfig, rules: Vec<PatternRule>) -> EngineResult<Self> {
        Self::with_analyzer(config, PatternAnalyzer::new(rules))
    }

    fn with_analyzer(config: EngineConfig, analyzer: PatternAnalyzer) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            converter: CalendarConverter::new(&config),
            epoch: EpochResolver::default(),
            plates: PlateBuilder::new(),
            analyzer,
            classifier: IntentClassifier::new(),
            evaluator: StrengthEvaluator::new(),
            synthesizer: OutcomeSynthesizer::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &PatternAnalyzer {
        &self.analyzer
    }
}

/// Runs readings against a borrowed context
#[derive(Debug, Clone, Copy)]
pub struct QimenEngine<'a> {
    context: &'a EngineContext,
}

impl<'a> QimenEngine<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    /// Full reading for one request.
    ///
    /// Fails only on invalid input; everything after validation degrades
    /// into advisories instead of erroring.
    pub fn read(&self, request: &ReadingRequest) -> EngineResult<Reading> {
        let ctx = self.context;

        if request.query.trim().is_empty() {
            return Err(EngineError::EmptyQuery);
        }
        // Requests may arrive deserialized, so the moment is checked again
        let moment = CalendarMoment::new(request.moment.civil, request.moment.longitude)?;
        let cache_key = cache_key(request, &ctx.config)?;
        debug!(cache_key = %cache_key, civil = %moment.civil, "reading started");

        let calendar = ctx.converter.convert(&moment);
        let mut advisories = calendar.advisories;

        let (cycle, epoch_advisories) = ctx.epoch.resolve(&calendar.solar_term);
        advisories.extend(epoch_advisories);

        let (plate, plate_advisories) = ctx.plates.build(cycle, calendar.pillars.hour);
        advisories.extend(plate_advisories);

        let matches = ctx.analyzer.analyze(&plate);

        let intent = ctx.classifier.classify(&request.query);
        let profile = request.profile.as_ref();
        let natal_year = match profile.and_then(|p| p.reference_date) {
            Some(date) => {
                let year = natal_year(&ctx.converter, date);
                if year.is_none() {
                    warn!(date = %date, "reference date outside supported range");
                    advisories.push(Advisory::new(
                        ReasonCode::R102_REFERENCE_DATE_UNUSABLE,
                        format!("{} outside {}-{}", date, MIN_YEAR, MAX_YEAR),
                    ));
                }
                year
            }
            None => None,
        };
        let subjects = select_subjects(intent, &calendar.pillars, profile, natal_year);

        let (subject_scores, subject_advisories) =
            ctx.evaluator
                .evaluate(intent, &subjects, &plate, calendar.solar_term.term);
        advisories.extend(subject_advisories);

        let outcome = ctx.synthesizer.synthesize(&matches, &subject_scores);

        let degraded = is_degraded(&plate, &advisories);
        for advisory in &advisories {
            warn!(code = advisory.code.code(), detail = %advisory.detail, "advisory");
        }

        info!(
            term = calendar.solar_term.term.name(),
            cycle = %cycle,
            intent = %intent,
            matches = matches.len(),
            probability = outcome.probability,
            degraded,
            "reading complete"
        );

        Ok(Reading {
            cache_key,
            moment,
            pillars: calendar.pillars,
            solar_term: calendar.solar_term,
            cycle,
            plate,
            matches,
            subjects: subject_scores,
            outcome,
            advisories,
            degraded,
        })
    }
}

/// A reading is degraded when the plate is, or any advisory says so
fn is_degraded(plate: &Plate, advisories: &[Advisory]) -> bool {
    plate.degraded || advisories.iter().any(|a| a.code.is_degrading())
}

/// Year pillar of a reference date, `None` outside the supported years
fn natal_year(converter: &CalendarConverter, date: chrono::NaiveDate) -> Option<SexagenaryLabel> {
    (MIN_YEAR..=MAX_YEAR)
        .contains(&date.year())
        .then(|| converter.year_pillar_for_date(date))
}

/// SHA-256 hex over the canonical request and config
pub fn cache_key(request: &ReadingRequest, config: &EngineConfig) -> EngineResult<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(request)?);
    hasher.update([0u8]); // Separator
    hasher.update(serde_json::to_vec(config)?);
    let digest = hasher.finalize();
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

// =============================================================================
// TESTS
// =============================================================================
