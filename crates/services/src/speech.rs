use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use speakscore_config::SpeechServiceSettings;
use speakscore_scoring::{AssessRequest, RawAssessment, SpeechAssessor, TransientFailure};
use tracing::debug;

/// HTTP client for the external pronunciation-assessment service.
///
/// Posts the reference text and audio location, returns the service's JSON
/// payload untouched; `speakscore_scoring::extract` owns interpreting it.
pub struct SpeechAssessmentClient {
    settings: SpeechServiceSettings,
    client: reqwest::Client,
}

impl SpeechAssessmentClient {
    pub fn new(settings: SpeechServiceSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl SpeechAssessor for SpeechAssessmentClient {
    async fn assess(&self, request: AssessRequest) -> anyhow::Result<RawAssessment> {
        let mut http_request = self.client.post(&self.settings.endpoint).json(&request);
        if !self.settings.api_key.is_empty() {
            http_request = http_request.bearer_auth(&self.settings.api_key);
        }

        let response = http_request.send().await.map_err(classify)?;

        let status = response.status();
        if status.is_server_error() {
            anyhow::bail!(TransientFailure(format!(
                "assessment service returned {status}"
            )));
        }
        if !status.is_success() {
            // 4xx: the service rejected the request; retrying won't help.
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("assessment service rejected the request ({status}): {body}");
        }

        let payload = response.json::<Value>().await.map_err(classify)?;
        debug!(endpoint = %self.settings.endpoint, "Assessment payload received");
        Ok(RawAssessment(payload))
    }

    fn name(&self) -> &str {
        "speech_http"
    }
}

fn classify(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() || error.is_connect() {
        anyhow::Error::new(TransientFailure(error.to_string()))
    } else {
        anyhow::Error::new(error)
    }
}
