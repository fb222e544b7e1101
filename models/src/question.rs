use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Fill,
    Short,
    Long,
}

impl QuestionKind {
    /// Objective kinds can be marked against `correct_answer` without an
    /// evaluator.
    pub fn is_objective(&self) -> bool {
        matches!(self, QuestionKind::Mcq | QuestionKind::Fill)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A question-bank entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "questionText")]
    pub question_text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Choices shown for `mcq` questions.
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    pub marks: i64,
    pub trade: String,
    pub level: String,
    pub skill: String,
    pub difficulty: Difficulty,
    pub explanation: Option<String>,
    #[serde(rename = "createdBy")]
    pub created_by: ObjectId,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "usageCount")]
    pub usage_count: i64,
}
