use std::sync::Arc;

use speakscore_api::{build_router, state::AppState};
use speakscore_config::Settings;
use speakscore_scoring::{AssessmentOrchestrator, ScoringConfig};
use speakscore_services::dao::assessment_record::AssessmentRecordDao;
use speakscore_services::{FeedbackClient, MongoScoreStore, SpeechAssessmentClient};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,speakscore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;

    let db = speakscore_db::connect(&settings.mongo).await?;
    speakscore_db::indexes::ensure_indexes(&db).await?;

    let assessor = Arc::new(SpeechAssessmentClient::new(settings.speech.clone())?);
    let feedback = Arc::new(FeedbackClient::new(settings.feedback.clone())?);
    let store = Arc::new(MongoScoreStore::new(&db));

    let scoring_config = ScoringConfig {
        phoneme_accuracy_threshold: settings.scoring.phoneme_accuracy_threshold,
        assess_timeout_ms: settings.speech.timeout_ms,
        feedback_timeout_ms: settings.feedback.timeout_ms,
    };
    let orchestrator = AssessmentOrchestrator::new(assessor, feedback, store, scoring_config);

    let state = AppState {
        orchestrator,
        records: Arc::new(AssessmentRecordDao::new(&db)),
    };

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Speakscore API listening");
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
