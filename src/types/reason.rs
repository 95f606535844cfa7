//! Reason codes for non-fatal conditions raised while building a reading
//! R1xx ephemeris, R2xx plate, R3xx subjects, R4xx table invariants

use serde::{Deserialize, Serialize};

/// Reason codes for advisories attached to a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Ephemeris
    // =========================================================================
    /// Solar-term root finder hit its iteration cap
    R101_TERM_APPROXIMATE,
    /// Natal year could not be derived from the reference date
    R102_REFERENCE_DATE_UNUSABLE,

    // =========================================================================
    // R2xx: Plate
    // =========================================================================
    /// Hour marker not found on the ground layer, rotation skipped
    R201_HOUR_MARKER_MISSING,

    // =========================================================================
    // R3xx: Subjects
    // =========================================================================
    /// Subject marker not present on either layer
    R301_SUBJECT_NOT_FOUND,

    // =========================================================================
    // R4xx: Invariants
    // =========================================================================
    /// Term index outside 0-23, fell back to the winter solstice
    R401_TERM_INDEX_FALLBACK,
    /// Ju outside 1-9, fell back to ju 1
    R402_JU_FALLBACK,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_TERM_APPROXIMATE => "R101_TERM_APPROXIMATE",
            Self::R102_REFERENCE_DATE_UNUSABLE => "R102_REFERENCE_DATE_UNUSABLE",
            Self::R201_HOUR_MARKER_MISSING => "R201_HOUR_MARKER_MISSING",
            Self::R301_SUBJECT_NOT_FOUND => "R301_SUBJECT_NOT_FOUND",
            Self::R401_TERM_INDEX_FALLBACK => "R401_TERM_INDEX_FALLBACK",
            Self::R402_JU_FALLBACK => "R402_JU_FALLBACK",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_TERM_APPROXIMATE => "Solar term crossing is approximate",
            Self::R102_REFERENCE_DATE_UNUSABLE => "Reference date ignored",
            Self::R201_HOUR_MARKER_MISSING => "Hour marker missing, heaven layer unrotated",
            Self::R301_SUBJECT_NOT_FOUND => "Subject not on plate",
            Self::R401_TERM_INDEX_FALLBACK => "Term index out of range",
            Self::R402_JU_FALLBACK => "Ju out of range",
        }
    }

    /// Whether the reading should be flagged degraded
    pub fn is_degrading(&self) -> bool {
        !matches!(
            self,
            Self::R301_SUBJECT_NOT_FOUND | Self::R102_REFERENCE_DATE_UNUSABLE
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// A reason code with request-specific detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub code: ReasonCode,
    pub detail: String,
}

impl Advisory {
    pub fn new(code: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.detail)
    }
}

// =============================================================================
// TESTS
// =============================================================================
