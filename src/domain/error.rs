// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the core can report, as one enum.
//
//   Fetch             — the model source was unreachable or
//                       answered with a non-success status
//   Schema            — the model document is malformed
//                       (wrong shape, missing or non-numeric fields)
//   DimensionMismatch — the feature vector length disagrees
//                       with the weight matrix
//   InvalidBuffer     — a pixel buffer whose sample count does
//                       not match its dimensions
//   Busy              — a prediction is already in flight
//   Inference         — the tensor backend failed to hand back
//                       the probabilities
//
// An empty drawing is NOT an error: it is Outcome::Skipped.
//
// The CLI wraps these in anyhow::Error; inside the core we keep
// the typed enum so callers can match on the variant.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DigitError {
    #[error("failed to fetch model from '{location}': {reason}")]
    Fetch { location: String, reason: String },

    #[error("malformed model document: {0}")]
    Schema(String),

    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("a prediction is already in progress")]
    Busy,

    #[error("inference failed: {0}")]
    Inference(String),
}

impl DigitError {
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            reason:   reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for DigitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Schema(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DigitError>;
