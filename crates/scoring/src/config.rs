use serde::{Deserialize, Serialize};

/// Configuration for the scoring pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Phonemes scoring below this threshold, within words the assessor
    /// flagged as erroneous, count toward the running error tally.
    pub phoneme_accuracy_threshold: f64,
    /// Timeout for one pronunciation-assessment call. The call is on the
    /// critical path and gets a single retry on transient failure.
    pub assess_timeout_ms: u64,
    /// Hard ceiling for the feedback-generation call. On expiry the attempt
    /// is returned without feedback text.
    pub feedback_timeout_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            phoneme_accuracy_threshold: 60.0,
            assess_timeout_ms: 10_000,
            feedback_timeout_ms: 3_000,
        }
    }
}
