use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assess::{AssessRequest, FeedbackGenerator, RawAssessment, SpeechAssessor, TransientFailure};
use crate::config::ScoringConfig;
use crate::error::{ScoringError, ScoringResult};
use crate::store::ScoreStore;
use crate::types::{
    AssessmentRecord, AttemptKey, AttemptSubmission, FeedbackRequest, PhonemeTally,
};
use crate::{align, band, extract, phoneme};

/// Runs the full scoring pipeline for one spoken attempt.
///
/// The orchestrator is the only component with external dependencies; the
/// aligner, tally and band scorer it drives are pure and freely concurrent.
/// Created once at startup and shared via `Arc`.
pub struct AssessmentOrchestrator {
    assessor: Arc<dyn SpeechAssessor>,
    feedback: Arc<dyn FeedbackGenerator>,
    store: Arc<dyn ScoreStore>,
    config: ScoringConfig,
}

impl AssessmentOrchestrator {
    pub fn new(
        assessor: Arc<dyn SpeechAssessor>,
        feedback: Arc<dyn FeedbackGenerator>,
        store: Arc<dyn ScoreStore>,
        config: ScoringConfig,
    ) -> Arc<Self> {
        info!(
            assessor = assessor.name(),
            feedback = feedback.name(),
            "Assessment orchestrator created"
        );
        Arc::new(Self {
            assessor,
            feedback,
            store,
            config,
        })
    }

    /// Scores one attempt end to end.
    ///
    /// Assessment failure is fatal for the attempt and nothing is persisted.
    /// Feedback failure is not: the record is persisted and returned with
    /// `feedback_text = None`.
    pub async fn process_attempt(
        &self,
        submission: AttemptSubmission,
    ) -> ScoringResult<AssessmentRecord> {
        if submission.reference_text.trim().is_empty() {
            return Err(ScoringError::invalid_input(
                "reference_text",
                "must not be empty",
            ));
        }
        if submission.audio_url.trim().is_empty() {
            return Err(ScoringError::invalid_input("audio_url", "must not be empty"));
        }

        let raw = self.assess_with_retry(&submission).await?;
        let attempt = extract::attempt_from_raw(&raw)?;

        let reference_tokens = align::tokenize(&submission.reference_text);
        let transcript_tokens = align::tokenize(&attempt.transcript);
        let miscues = align::align(&reference_tokens, &transcript_tokens);

        let delta = phoneme::tally_attempt(
            &attempt.word_assessments,
            self.config.phoneme_accuracy_threshold,
        );
        let band = band::score_band(&attempt.sub_scores)?;

        let totals = self.merge_totals(&submission, &delta).await?;

        let feedback_request = FeedbackRequest {
            band: band.band,
            sub_scores: attempt.sub_scores.clone(),
            transcript: attempt.transcript.clone(),
            miscue_words: align::miscue_words(&miscues),
        };
        let feedback_text = self.generate_feedback(&feedback_request).await;

        let record = AssessmentRecord {
            attempt_id: Uuid::new_v4(),
            key: submission.key,
            band: band.band,
            raw_weighted_score: band.raw_weighted_score,
            sub_scores: attempt.sub_scores,
            reference_text: submission.reference_text,
            transcript: attempt.transcript,
            miscues,
            phoneme_delta: delta,
            phoneme_totals: totals,
            feedback_text,
            created_at: Utc::now(),
        };
        self.store.save_assessment(&record).await?;

        info!(
            attempt_id = %record.attempt_id,
            band = record.band,
            miscues = record.miscues.len(),
            has_feedback = record.feedback_text.is_some(),
            "Attempt scored"
        );
        Ok(record)
    }

    /// The assessment call is on the critical path: bounded timeout, one
    /// retry on transient failure, no retry on semantic rejections.
    async fn assess_with_retry(
        &self,
        submission: &AttemptSubmission,
    ) -> ScoringResult<RawAssessment> {
        let timeout = Duration::from_millis(self.config.assess_timeout_ms);
        let request = AssessRequest {
            reference_text: submission.reference_text.clone(),
            audio_url: submission.audio_url.clone(),
        };

        match tokio::time::timeout(timeout, self.assessor.assess(request.clone())).await {
            Ok(Ok(raw)) => return Ok(raw),
            Ok(Err(error)) => {
                if error.downcast_ref::<TransientFailure>().is_none() {
                    return Err(ScoringError::ServiceUnavailable(error.to_string()));
                }
                warn!(
                    assessor = self.assessor.name(),
                    %error,
                    "Assessment call failed, retrying once"
                );
            }
            Err(_) => {
                warn!(
                    assessor = self.assessor.name(),
                    timeout_ms = self.config.assess_timeout_ms,
                    "Assessment call timed out, retrying once"
                );
            }
        }

        match tokio::time::timeout(timeout, self.assessor.assess(request)).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(error)) => Err(ScoringError::ServiceUnavailable(error.to_string())),
            Err(_) => Err(ScoringError::ServiceUnavailable(format!(
                "timed out after {}ms",
                self.config.assess_timeout_ms
            ))),
        }
    }

    /// One internal retry with the storage layer before a conflict becomes
    /// fatal. The increment itself is atomic per key, so the retry is safe
    /// to repeat with the same delta.
    async fn merge_totals(
        &self,
        submission: &AttemptSubmission,
        delta: &PhonemeTally,
    ) -> ScoringResult<PhonemeTally> {
        match self
            .store
            .increment_phoneme_totals(&submission.key, delta)
            .await
        {
            Err(ScoringError::StorageConflict(reason)) => {
                warn!(%reason, "Phoneme total merge conflicted, retrying once");
                self.store
                    .increment_phoneme_totals(&submission.key, delta)
                    .await
            }
            other => other,
        }
    }

    /// Best-effort: a hard ceiling after which the attempt proceeds without
    /// feedback. Failures degrade to `None`, they are never surfaced as
    /// errors.
    async fn generate_feedback(&self, request: &FeedbackRequest) -> Option<String> {
        match self.try_generate_feedback(request).await {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(
                    generator = self.feedback.name(),
                    %error,
                    "Continuing without feedback"
                );
                None
            }
        }
    }

    async fn try_generate_feedback(&self, request: &FeedbackRequest) -> ScoringResult<String> {
        let timeout = Duration::from_millis(self.config.feedback_timeout_ms);
        match tokio::time::timeout(timeout, self.feedback.generate(request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                debug!(chars = text.len(), "Feedback generated");
                Ok(text)
            }
            Ok(Ok(_)) => Err(ScoringError::FeedbackUnavailable(
                "feedback service returned empty text".to_string(),
            )),
            Ok(Err(error)) => Err(ScoringError::FeedbackUnavailable(error.to_string())),
            Err(_) => Err(ScoringError::FeedbackUnavailable(format!(
                "timed out after {}ms",
                self.config.feedback_timeout_ms
            ))),
        }
    }

    /// Running totals for a key, for "top incorrect phonemes" style views.
    pub async fn phoneme_totals(&self, key: &AttemptKey) -> ScoringResult<PhonemeTally> {
        self.store.phoneme_totals(key).await
    }
}
