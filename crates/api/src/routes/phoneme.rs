use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use speakscore_scoring::{AttemptKey, phoneme};

use super::attempt::parse_object_id;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub top: Option<usize>,
}

/// Running phoneme-error totals for one student/lesson/question triple.
/// With `?top=N`, returns only the N most frequent phonemes (ties broken by
/// symbol so the view is stable across calls).
pub async fn totals(
    State(state): State<AppState>,
    Path((student_id, lesson_result_id, question_id)): Path<(String, String, String)>,
    Query(query): Query<TopQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let key = AttemptKey {
        student_id: parse_object_id(&student_id, "student_id")?,
        lesson_result_id: parse_object_id(&lesson_result_id, "lesson_result_id")?,
        question_id: parse_object_id(&question_id, "question_id")?,
    };

    let totals = state.orchestrator.phoneme_totals(&key).await?;

    match query.top {
        Some(n) => {
            let top: Vec<serde_json::Value> = phoneme::top_phonemes(&totals, n)
                .into_iter()
                .map(|(phoneme, count)| {
                    serde_json::json!({ "phoneme": phoneme, "count": count })
                })
                .collect();
            Ok(Json(serde_json::json!({ "top": top })))
        }
        None => Ok(Json(serde_json::json!({ "totals": totals }))),
    }
}
