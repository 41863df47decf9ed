use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::FeedbackRequest;

/// Opaque payload returned by the external pronunciation-assessment
/// service. Only `extract` looks inside; nothing downstream branches on
/// the wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAssessment(pub Value);

/// Request for one attempt's pronunciation assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessRequest {
    pub reference_text: String,
    /// Where the recorded audio lives; the assessment service fetches it.
    pub audio_url: String,
}

/// Marker wrapped by collaborator clients around connect/timeout-class
/// failures. The orchestrator retries these once; semantic rejections are
/// not retried.
#[derive(Debug, thiserror::Error)]
#[error("transient collaborator failure: {0}")]
pub struct TransientFailure(pub String);

/// Trait for pluggable pronunciation-assessment collaborators.
#[async_trait]
pub trait SpeechAssessor: Send + Sync + 'static {
    /// Assesses one spoken attempt against its reference text.
    async fn assess(&self, request: AssessRequest) -> anyhow::Result<RawAssessment>;

    /// Human-readable collaborator name.
    fn name(&self) -> &str;
}

/// Trait for pluggable feedback-generation collaborators.
///
/// The returned prose is opaque to this system and passed through
/// unmodified; the orchestrator only checks it is non-empty.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync + 'static {
    async fn generate(&self, request: &FeedbackRequest) -> anyhow::Result<String>;

    fn name(&self) -> &str;
}
