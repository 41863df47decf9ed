use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application settings.
///
/// Loaded from `config/default.toml`, an optional `config/{RUN_ENV}.toml`
/// overlay, and `SPEAKSCORE__`-prefixed environment variables
/// (e.g. `SPEAKSCORE__MONGO__URI`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub mongo: MongoSettings,
    #[serde(default)]
    pub speech: SpeechServiceSettings,
    #[serde(default)]
    pub feedback: FeedbackServiceSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "speakscore".to_string(),
        }
    }
}

/// External pronunciation-assessment service.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechServiceSettings {
    pub endpoint: String,
    /// API key sent as a bearer token. Empty = unauthenticated (dev).
    pub api_key: String,
    /// Per-call timeout. The call is retried once on transient failure.
    pub timeout_ms: u64,
}

impl Default for SpeechServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9100/assess".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
        }
    }
}

/// External feedback-generation service. Best-effort: on timeout the
/// attempt is scored and persisted without feedback text.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackServiceSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for FeedbackServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200/feedback".to_string(),
            timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    /// Phonemes scoring below this (within words the assessor flagged)
    /// count toward the running error tally.
    pub phoneme_accuracy_threshold: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            phoneme_accuracy_threshold: 60.0,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_env}")).required(false))
            .add_source(Environment::with_prefix("SPEAKSCORE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
