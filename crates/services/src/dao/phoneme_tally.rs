use std::collections::BTreeMap;

use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use mongodb::options::ReturnDocument;
use speakscore_db::models::PhonemeTallyDoc;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct PhonemeTallyDao {
    pub base: BaseDao<PhonemeTallyDoc>,
}

impl PhonemeTallyDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, PhonemeTallyDoc::COLLECTION),
        }
    }

    pub async fn find_for_key(
        &self,
        student_id: ObjectId,
        lesson_result_id: ObjectId,
        question_id: ObjectId,
    ) -> DaoResult<Option<PhonemeTallyDoc>> {
        self.base
            .find_one(doc! {
                "student_id": student_id,
                "lesson_result_id": lesson_result_id,
                "question_id": question_id,
            })
            .await
    }

    /// Merges an attempt's phoneme counts into the running totals as one
    /// atomic `$inc` upsert, and returns the merged document.
    ///
    /// Two concurrent merges for the same key either both `$inc` the
    /// existing document, or race on the insert and one loses to the unique
    /// index (surfaced as `DaoError::DuplicateKey`; callers retry once and
    /// then `$inc` the now-existing document).
    pub async fn increment_counts(
        &self,
        student_id: ObjectId,
        lesson_result_id: ObjectId,
        question_id: ObjectId,
        delta: &BTreeMap<String, u32>,
    ) -> DaoResult<PhonemeTallyDoc> {
        let now = DateTime::now();
        let mut update = doc! {
            "$set": { "updated_at": now },
            "$setOnInsert": { "created_at": now },
        };
        let inc = inc_document(delta);
        if !inc.is_empty() {
            update.insert("$inc", inc);
        }

        self.base
            .collection()
            .find_one_and_update(
                doc! {
                    "student_id": student_id,
                    "lesson_result_id": lesson_result_id,
                    "question_id": question_id,
                },
                update,
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(DaoError::from)?
            .ok_or(DaoError::NotFound)
    }
}

/// Builds the `$inc` paths for a tally delta. Phoneme symbols never contain
/// `.`, which an update path would split into nested fields.
fn inc_document(delta: &BTreeMap<String, u32>) -> Document {
    let mut inc = Document::new();
    for (phoneme, count) in delta {
        inc.insert(format!("counts.{phoneme}"), i64::from(*count));
    }
    inc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inc_document_paths_and_values() {
        let delta: BTreeMap<String, u32> =
            [("/θ/".to_string(), 3), ("/ð/".to_string(), 1)].into_iter().collect();
        let inc = inc_document(&delta);
        assert_eq!(inc.get_i64("counts./θ/").unwrap(), 3);
        assert_eq!(inc.get_i64("counts./ð/").unwrap(), 1);
        assert_eq!(inc.len(), 2);
    }

    #[test]
    fn test_inc_document_empty_delta() {
        assert!(inc_document(&BTreeMap::new()).is_empty());
    }
}
