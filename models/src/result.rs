use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Pending,
    Evaluated,
    Approved,
    Rejected,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Pending => "pending",
            ResultStatus::Evaluated => "evaluated",
            ResultStatus::Approved => "approved",
            ResultStatus::Rejected => "rejected",
        }
    }
}

// Lets the status be used directly as a `doc!` value in queries.
impl From<ResultStatus> for bson::Bson {
    fn from(status: ResultStatus) -> Self {
        bson::Bson::String(status.as_str().to_string())
    }
}

/// One submitted answer, in exam order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerEntry {
    #[serde(rename = "questionId")]
    pub question_id: ObjectId,
    #[serde(rename = "selectedAnswer")]
    pub selected_answer: Option<String>,
    #[serde(rename = "marksAwarded")]
    pub marks_awarded: f64,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// A candidate's result for one exam. Unique per (exam, candidate) pair.
///
/// `total_marks` and `percentage` are derived from the component marks and
/// recomputed together before every save. Pass/fail is never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "examId")]
    pub exam_id: ObjectId,
    #[serde(rename = "candidateId")]
    pub candidate_id: ObjectId,
    pub answers: Vec<AnswerEntry>,
    #[serde(rename = "theoryMarks")]
    pub theory_marks: f64,
    #[serde(rename = "practicalMarks")]
    pub practical_marks: f64,
    #[serde(rename = "vivaMarks")]
    pub viva_marks: f64,
    #[serde(rename = "totalMarks")]
    pub total_marks: f64,
    /// Unset until the owning exam's capacity is known and positive.
    pub percentage: Option<f64>,
    pub status: ResultStatus,
    #[serde(rename = "evaluatedBy")]
    pub evaluated_by: Option<ObjectId>,
    #[serde(rename = "evaluatedAt")]
    pub evaluated_at: Option<DateTime>,
    #[serde(rename = "approvedBy")]
    pub approved_by: Option<ObjectId>,
    #[serde(rename = "approvedAt")]
    pub approved_at: Option<DateTime>,
    pub feedback: Option<String>,
    #[serde(rename = "timeSpentInS")]
    pub time_spent_in_s: i64,
    /// Bumped on every save. A stale value fails the write.
    pub version: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime,
}

impl ExamResult {
    /// A fresh `pending` record with nothing marked yet.
    pub fn new(exam_id: ObjectId, candidate_id: ObjectId) -> Self {
        let now = DateTime::now();
        ExamResult {
            id: ObjectId::new(),
            exam_id,
            candidate_id,
            answers: vec![],
            theory_marks: 0.0,
            practical_marks: 0.0,
            viva_marks: 0.0,
            total_marks: 0.0,
            percentage: None,
            status: ResultStatus::Pending,
            evaluated_by: None,
            evaluated_at: None,
            approved_by: None,
            approved_at: None,
            feedback: None,
            time_spent_in_s: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
