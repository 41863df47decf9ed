pub mod memory;

pub use memory::MemoryScoreStore;

use async_trait::async_trait;

use crate::error::ScoringResult;
use crate::types::{AssessmentRecord, AttemptKey, PhonemeTally};

/// Persistence boundary for scored attempts and running phoneme totals.
///
/// The merge is the upsert boundary: implementations must apply
/// `increment_phoneme_totals` atomically per key, so two concurrent
/// submissions for the same key both land (per-key addition, no lost
/// updates). No ordering is required between different keys.
#[async_trait]
pub trait ScoreStore: Send + Sync + 'static {
    /// Current running totals for a key; empty if no attempt was recorded yet.
    async fn phoneme_totals(&self, key: &AttemptKey) -> ScoringResult<PhonemeTally>;

    /// Atomically merges `delta` into the running totals for `key` and
    /// returns the merged mapping.
    async fn increment_phoneme_totals(
        &self,
        key: &AttemptKey,
        delta: &PhonemeTally,
    ) -> ScoringResult<PhonemeTally>;

    async fn save_assessment(&self, record: &AssessmentRecord) -> ScoringResult<()>;
}
