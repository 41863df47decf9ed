use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use speakscore_config::FeedbackServiceSettings;
use speakscore_scoring::{FeedbackGenerator, FeedbackRequest};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    feedback: String,
}

/// HTTP client for the external feedback-generation service.
///
/// The returned prose is passed through unmodified; the orchestrator treats
/// this call as best-effort and only checks the text is non-empty.
pub struct FeedbackClient {
    settings: FeedbackServiceSettings,
    client: reqwest::Client,
}

impl FeedbackClient {
    pub fn new(settings: FeedbackServiceSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl FeedbackGenerator for FeedbackClient {
    async fn generate(&self, request: &FeedbackRequest) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<FeedbackResponse>()
            .await?;

        debug!(chars = response.feedback.len(), "Feedback text received");
        Ok(response.feedback)
    }

    fn name(&self) -> &str {
        "feedback_http"
    }
}
