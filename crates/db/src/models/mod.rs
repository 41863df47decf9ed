mod assessment_record;
mod phoneme_tally;

pub use assessment_record::{AssessmentRecordDoc, MiscueEntry, SubScoresDoc};
pub use phoneme_tally::PhonemeTallyDoc;
