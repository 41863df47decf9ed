pub mod align;
pub mod assess;
pub mod band;
pub mod config;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod phoneme;
pub mod store;
pub mod types;

pub use assess::{AssessRequest, FeedbackGenerator, RawAssessment, SpeechAssessor, TransientFailure};
pub use config::ScoringConfig;
pub use error::{ScoringError, ScoringResult};
pub use orchestrator::AssessmentOrchestrator;
pub use store::{MemoryScoreStore, ScoreStore};
pub use types::{
    AssessedErrorType, AssessmentRecord, AttemptAssessment, AttemptKey, AttemptSubmission,
    BandResult, FeedbackRequest, Miscue, MiscueKind, PhonemeScore, PhonemeTally, SubScoreSet,
    WordAssessment,
};
