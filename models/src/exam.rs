use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A scheduled examination. Immutable once results reference it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exam {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub trade: String,
    pub level: String,
    pub skill: String,
    /// Scheduled start.
    #[serde(rename = "dateTime")]
    pub date_time: DateTime,
    #[serde(rename = "durationInM")]
    pub duration_in_m: i64,
    /// Capacity the percentage is computed against. Positive.
    #[serde(rename = "totalMarks")]
    pub total_marks: i64,
    /// Minimum total to pass. Never exceeds `total_marks`.
    #[serde(rename = "passingMarks")]
    pub passing_marks: i64,
    pub instructions: Option<String>,
    pub questions: Vec<ObjectId>,
    #[serde(rename = "createdBy")]
    pub created_by: ObjectId,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "publishDate")]
    pub publish_date: Option<DateTime>,
}
