use async_trait::async_trait;
use mongodb::Database;
use speakscore_db::models::{AssessmentRecordDoc, MiscueEntry, SubScoresDoc};
use speakscore_scoring::{
    AssessmentRecord, AttemptKey, PhonemeTally, ScoreStore, ScoringError, ScoringResult,
};

use crate::dao::assessment_record::AssessmentRecordDao;
use crate::dao::base::DaoError;
use crate::dao::phoneme_tally::PhonemeTallyDao;

/// MongoDB-backed `ScoreStore`.
///
/// The phoneme merge is a single `$inc` upsert, so it is atomic per key at
/// the storage layer; an insert race on the unique key index surfaces as
/// `StorageConflict`, which the orchestrator retries once.
pub struct MongoScoreStore {
    tallies: PhonemeTallyDao,
    records: AssessmentRecordDao,
}

impl MongoScoreStore {
    pub fn new(db: &Database) -> Self {
        Self {
            tallies: PhonemeTallyDao::new(db),
            records: AssessmentRecordDao::new(db),
        }
    }
}

#[async_trait]
impl ScoreStore for MongoScoreStore {
    async fn phoneme_totals(&self, key: &AttemptKey) -> ScoringResult<PhonemeTally> {
        let doc = self
            .tallies
            .find_for_key(key.student_id, key.lesson_result_id, key.question_id)
            .await
            .map_err(into_scoring_error)?;
        Ok(doc.map(|d| d.counts).unwrap_or_default())
    }

    async fn increment_phoneme_totals(
        &self,
        key: &AttemptKey,
        delta: &PhonemeTally,
    ) -> ScoringResult<PhonemeTally> {
        self.tallies
            .increment_counts(key.student_id, key.lesson_result_id, key.question_id, delta)
            .await
            .map(|doc| doc.counts)
            .map_err(into_scoring_error)
    }

    async fn save_assessment(&self, record: &AssessmentRecord) -> ScoringResult<()> {
        self.records
            .create(doc_from_record(record))
            .await
            .map(|_| ())
            .map_err(into_scoring_error)
    }
}

fn into_scoring_error(error: DaoError) -> ScoringError {
    match error {
        DaoError::DuplicateKey(message) => ScoringError::StorageConflict(message),
        other => ScoringError::Storage(other.to_string()),
    }
}

fn doc_from_record(record: &AssessmentRecord) -> AssessmentRecordDoc {
    AssessmentRecordDoc {
        id: None,
        attempt_id: record.attempt_id,
        student_id: record.key.student_id,
        lesson_result_id: record.key.lesson_result_id,
        question_id: record.key.question_id,
        band: record.band,
        raw_weighted_score: record.raw_weighted_score,
        sub_scores: SubScoresDoc {
            accuracy: record.sub_scores.accuracy,
            fluency: record.sub_scores.fluency,
            completeness: record.sub_scores.completeness,
            pronunciation: record.sub_scores.pronunciation,
        },
        reference_text: record.reference_text.clone(),
        transcript: record.transcript.clone(),
        miscues: record
            .miscues
            .iter()
            .map(|m| MiscueEntry {
                kind: m.kind.to_string(),
                reference_index: m.reference_index.map(|i| i as u32),
                transcript_index: m.transcript_index.map(|i| i as u32),
                reference_word: m.reference_word.clone(),
                transcript_word: m.transcript_word.clone(),
            })
            .collect(),
        phoneme_delta: record.phoneme_delta.clone(),
        phoneme_totals: record.phoneme_totals.clone(),
        feedback_text: record.feedback_text.clone(),
        created_at: bson::DateTime::from_chrono(record.created_at),
    }
}
