use thiserror::Error;

/// Failure taxonomy for attempt scoring.
///
/// `InvalidInput` and `ServiceUnavailable` reach the caller with distinct,
/// actionable messages (fix the submission vs. retry the recording later).
/// `FeedbackUnavailable` never does: the orchestrator degrades it to
/// `feedback_text = None` and still persists the scored attempt.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid input in '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Speech assessment service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Feedback generation unavailable: {0}")]
    FeedbackUnavailable(String),

    #[error("Conflict while merging phoneme totals: {0}")]
    StorageConflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScoringError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;
