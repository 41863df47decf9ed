use bson::doc;
use mongodb::Database;
use speakscore_db::models::AssessmentRecordDoc;
use uuid::Uuid;

use super::base::{BaseDao, DaoResult};

pub struct AssessmentRecordDao {
    pub base: BaseDao<AssessmentRecordDoc>,
}

impl AssessmentRecordDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, AssessmentRecordDoc::COLLECTION),
        }
    }

    pub async fn create(&self, record: AssessmentRecordDoc) -> DaoResult<AssessmentRecordDoc> {
        let id = self.base.insert_one(&record).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_attempt_id(&self, attempt_id: Uuid) -> DaoResult<Option<AssessmentRecordDoc>> {
        self.base
            .find_one(doc! { "attempt_id": bson::to_bson(&attempt_id)? })
            .await
    }
}
