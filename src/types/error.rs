//! Errors that abort a reading before any derivation

/// Errors surfaced to the caller
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Invalid moment: {0}")]
    InvalidMoment(String),

    #[error("Invalid longitude: {0} (expected -180..=180)")]
    InvalidLongitude(f64),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type EngineResult<T> = Result<T, EngineError>;
