use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{AssessmentRecordDoc, PhonemeTallyDoc};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Phoneme tallies: one document per (student, lesson result, question).
    // The unique index is what lets the $inc merge run as a single upsert.
    create_indexes(
        db,
        PhonemeTallyDoc::COLLECTION,
        vec![
            index_unique(bson::doc! { "student_id": 1, "lesson_result_id": 1, "question_id": 1 }),
            index(bson::doc! { "student_id": 1, "updated_at": -1 }),
        ],
    )
    .await?;

    // Assessment records
    create_indexes(
        db,
        AssessmentRecordDoc::COLLECTION,
        vec![
            index_unique(bson::doc! { "attempt_id": 1 }),
            index(bson::doc! { "student_id": 1, "created_at": -1 }),
            index(bson::doc! { "student_id": 1, "lesson_result_id": 1, "question_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    models: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(models)
        .await?;
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
