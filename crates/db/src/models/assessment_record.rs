use std::collections::BTreeMap;

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scored spoken attempt, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecordDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Stable attempt identifier, assigned by the orchestrator.
    pub attempt_id: Uuid,
    pub student_id: ObjectId,
    pub lesson_result_id: ObjectId,
    pub question_id: ObjectId,
    pub band: f64,
    pub raw_weighted_score: f64,
    pub sub_scores: SubScoresDoc,
    pub reference_text: String,
    pub transcript: String,
    #[serde(default)]
    pub miscues: Vec<MiscueEntry>,
    /// Phoneme errors from this attempt alone.
    #[serde(default)]
    pub phoneme_delta: BTreeMap<String, u32>,
    /// Running totals after this attempt was merged in.
    #[serde(default)]
    pub phoneme_totals: BTreeMap<String, u32>,
    /// None when the feedback service was unavailable for this attempt.
    pub feedback_text: Option<String>,
    pub created_at: DateTime,
}

impl AssessmentRecordDoc {
    pub const COLLECTION: &'static str = "assessment_records";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScoresDoc {
    pub accuracy: f64,
    pub fluency: f64,
    pub completeness: f64,
    pub pronunciation: f64,
}

/// One word-level divergence between reference text and transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiscueEntry {
    /// "substitution", "insertion" or "deletion".
    pub kind: String,
    pub reference_index: Option<u32>,
    pub transcript_index: Option<u32>,
    pub reference_word: Option<String>,
    pub transcript_word: Option<String>,
}
