use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::Deserialize;
use speakscore_db::models::AssessmentRecordDoc;
use speakscore_scoring::{AttemptKey, AttemptSubmission};
use uuid::Uuid;
use validator::Validate;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct ScoreAttemptRequest {
    pub student_id: String,
    pub lesson_result_id: String,
    pub question_id: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub reference_text: String,
    #[validate(url(message = "must be a valid URL"))]
    pub audio_url: String,
}

pub async fn score(
    State(state): State<AppState>,
    Json(request): Json<ScoreAttemptRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let submission = AttemptSubmission {
        key: AttemptKey {
            student_id: parse_object_id(&request.student_id, "student_id")?,
            lesson_result_id: parse_object_id(&request.lesson_result_id, "lesson_result_id")?,
            question_id: parse_object_id(&request.question_id, "question_id")?,
        },
        reference_text: request.reference_text,
        audio_url: request.audio_url,
    };

    let record = state.orchestrator.process_attempt(submission).await?;

    Ok(Json(serde_json::json!({
        "attempt_id": record.attempt_id,
        "band": record.band,
        "raw_weighted_score": record.raw_weighted_score,
        "sub_scores": record.sub_scores,
        "transcript": record.transcript,
        "miscues": record.miscues,
        "phoneme_delta": record.phoneme_delta,
        "phoneme_totals": record.phoneme_totals,
        "feedback_text": record.feedback_text,
        "created_at": record.created_at.to_rfc3339(),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let attempt_id = Uuid::parse_str(&attempt_id)
        .map_err(|_| ApiError::BadRequest("Invalid attempt_id".to_string()))?;

    let record = state
        .records
        .find_by_attempt_id(attempt_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attempt not found".to_string()))?;

    Ok(Json(to_response(record)))
}

fn to_response(record: AssessmentRecordDoc) -> serde_json::Value {
    serde_json::json!({
        "attempt_id": record.attempt_id,
        "student_id": record.student_id.to_hex(),
        "lesson_result_id": record.lesson_result_id.to_hex(),
        "question_id": record.question_id.to_hex(),
        "band": record.band,
        "raw_weighted_score": record.raw_weighted_score,
        "sub_scores": record.sub_scores,
        "transcript": record.transcript,
        "miscues": record.miscues,
        "phoneme_delta": record.phoneme_delta,
        "phoneme_totals": record.phoneme_totals,
        "feedback_text": record.feedback_text,
        "created_at": record.created_at.try_to_rfc3339_string().unwrap_or_default(),
    })
}

pub(crate) fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}
