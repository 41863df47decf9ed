pub mod assessment_record;
pub mod base;
pub mod phoneme_tally;

pub use base::BaseDao;
