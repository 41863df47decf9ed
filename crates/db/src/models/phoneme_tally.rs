use std::collections::BTreeMap;

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Running per-phoneme error counts for one student/lesson/question triple.
///
/// Created lazily on the first attempt; later attempts merge their counts in
/// with a `$inc` upsert so concurrent submissions never lose updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeTallyDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub lesson_result_id: ObjectId,
    pub question_id: ObjectId,
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl PhonemeTallyDoc {
    pub const COLLECTION: &'static str = "phoneme_tallies";
}
