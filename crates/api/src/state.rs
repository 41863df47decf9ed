use std::sync::Arc;

use speakscore_scoring::AssessmentOrchestrator;
use speakscore_services::dao::assessment_record::AssessmentRecordDao;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AssessmentOrchestrator>,
    pub records: Arc<AssessmentRecordDao>,
}
