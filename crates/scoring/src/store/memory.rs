use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::ScoreStore;
use crate::error::ScoringResult;
use crate::phoneme;
use crate::types::{AssessmentRecord, AttemptKey, PhonemeTally};

/// In-memory store for tests and single-process runs.
///
/// The DashMap entry guard holds the shard lock for the key while the merge
/// runs, which makes `increment_phoneme_totals` atomic per key.
#[derive(Default)]
pub struct MemoryScoreStore {
    totals: DashMap<AttemptKey, PhonemeTally>,
    records: DashMap<Uuid, AssessmentRecord>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, attempt_id: &Uuid) -> Option<AssessmentRecord> {
        self.records.get(attempt_id).map(|r| r.value().clone())
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn phoneme_totals(&self, key: &AttemptKey) -> ScoringResult<PhonemeTally> {
        Ok(self
            .totals
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn increment_phoneme_totals(
        &self,
        key: &AttemptKey,
        delta: &PhonemeTally,
    ) -> ScoringResult<PhonemeTally> {
        let mut entry = self.totals.entry(key.clone()).or_default();
        phoneme::merge_into(entry.value_mut(), delta);
        Ok(entry.value().clone())
    }

    async fn save_assessment(&self, record: &AssessmentRecord) -> ScoringResult<()> {
        self.records.insert(record.attempt_id, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn key() -> AttemptKey {
        AttemptKey {
            student_id: ObjectId::new(),
            lesson_result_id: ObjectId::new(),
            question_id: ObjectId::new(),
        }
    }

    fn tally(entries: &[(&str, u32)]) -> PhonemeTally {
        entries.iter().map(|(p, c)| (p.to_string(), *c)).collect()
    }

    #[tokio::test]
    async fn test_increment_creates_then_merges() {
        let store = MemoryScoreStore::new();
        let key = key();

        let first = store
            .increment_phoneme_totals(&key, &tally(&[("/θ/", 2)]))
            .await
            .unwrap();
        assert_eq!(first, tally(&[("/θ/", 2)]));

        let second = store
            .increment_phoneme_totals(&key, &tally(&[("/θ/", 3), ("/ð/", 1)]))
            .await
            .unwrap();
        assert_eq!(second, tally(&[("/θ/", 5), ("/ð/", 1)]));

        assert_eq!(store.phoneme_totals(&key).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_concurrent_increments_for_same_key_all_land() {
        let store = std::sync::Arc::new(MemoryScoreStore::new());
        let key = key();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store
                    .increment_phoneme_totals(&key, &tally(&[("/s/", 1)]))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.phoneme_totals(&key).await.unwrap(), tally(&[("/s/", 32)]));
    }

    #[tokio::test]
    async fn test_totals_empty_for_unknown_key() {
        let store = MemoryScoreStore::new();
        assert!(store.phoneme_totals(&key()).await.unwrap().is_empty());
    }
}
