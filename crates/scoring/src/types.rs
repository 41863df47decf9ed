use std::collections::BTreeMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Running per-phoneme error counts. A `BTreeMap` keeps iteration in the
/// phoneme symbol's natural order, which is the documented tie-break for
/// top-N views.
pub type PhonemeTally = BTreeMap<String, u32>;

/// Identifies the running totals one attempt merges into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptKey {
    pub student_id: ObjectId,
    pub lesson_result_id: ObjectId,
    pub question_id: ObjectId,
}

/// One spoken attempt as submitted by the caller.
#[derive(Debug, Clone)]
pub struct AttemptSubmission {
    pub key: AttemptKey,
    /// The sentence the learner was asked to speak.
    pub reference_text: String,
    /// Where the recorded audio lives; fetched by the assessment service.
    pub audio_url: String,
}

/// Per-word classification label produced by the external assessment
/// service. The label set is owned by that service; labels we do not
/// recognize map to `Mispronunciation` rather than failing the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum AssessedErrorType {
    None,
    Mispronunciation,
    Omission,
    Insertion,
    UnexpectedBreak,
    MissingBreak,
    Monotone,
}

impl AssessedErrorType {
    pub fn parse(label: &str) -> Self {
        match label {
            "None" | "none" => Self::None,
            "Mispronunciation" | "mispronunciation" => Self::Mispronunciation,
            "Omission" | "omission" => Self::Omission,
            "Insertion" | "insertion" => Self::Insertion,
            "UnexpectedBreak" | "unexpected_break" => Self::UnexpectedBreak,
            "MissingBreak" | "missing_break" => Self::MissingBreak,
            "Monotone" | "monotone" => Self::Monotone,
            _ => Self::Mispronunciation,
        }
    }
}

impl From<String> for AssessedErrorType {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

/// Accuracy of one phoneme within an assessed word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeScore {
    pub phoneme: String,
    pub accuracy_score: f64,
}

/// Assessment of one recognized word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordAssessment {
    pub word: String,
    pub error_type: AssessedErrorType,
    #[serde(default)]
    pub phonemes: Vec<PhonemeScore>,
}

/// Validated view of the upstream assessment payload, built at the system
/// boundary. Internal components never see the raw wire shape.
#[derive(Debug, Clone)]
pub struct AttemptAssessment {
    pub transcript: String,
    pub sub_scores: SubScoreSet,
    pub word_assessments: Vec<WordAssessment>,
}

/// The four component measurements on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreSet {
    pub accuracy: f64,
    pub fluency: f64,
    pub completeness: f64,
    pub pronunciation: f64,
}

/// Composite band on the 0-9 half-step scale, plus the unrounded composite
/// it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandResult {
    pub band: f64,
    pub raw_weighted_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiscueKind {
    Substitution,
    Insertion,
    Deletion,
}

impl std::fmt::Display for MiscueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substitution => write!(f, "substitution"),
            Self::Insertion => write!(f, "insertion"),
            Self::Deletion => write!(f, "deletion"),
        }
    }
}

/// One position where the transcript diverges from the reference text.
///
/// Every reference word and every transcript word is covered by exactly one
/// alignment decision; miscues are the non-matching ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Miscue {
    pub kind: MiscueKind,
    pub reference_index: Option<usize>,
    pub transcript_index: Option<usize>,
    pub reference_word: Option<String>,
    pub transcript_word: Option<String>,
}

/// Structured summary handed to the external feedback generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub band: f64,
    pub sub_scores: SubScoreSet,
    pub transcript: String,
    pub miscue_words: Vec<String>,
}

/// The unit of result for one scored attempt: what gets persisted and what
/// the caller receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub attempt_id: Uuid,
    pub key: AttemptKey,
    pub band: f64,
    pub raw_weighted_score: f64,
    pub sub_scores: SubScoreSet,
    pub reference_text: String,
    pub transcript: String,
    pub miscues: Vec<Miscue>,
    /// Phoneme errors from this attempt alone.
    pub phoneme_delta: PhonemeTally,
    /// Running totals after this attempt was merged in.
    pub phoneme_totals: PhonemeTally,
    /// None when the feedback service was unavailable for this attempt.
    pub feedback_text: Option<String>,
    pub created_at: DateTime<Utc>,
}
