pub mod dao;
pub mod feedback;
pub mod speech;
pub mod store;

pub use dao::BaseDao;
pub use feedback::FeedbackClient;
pub use speech::SpeechAssessmentClient;
pub use store::MongoScoreStore;
