//! Document types for the examination-management collections.
//!
//! Field names follow the wire format of the `Exam`, `Question`, and
//! `ExamResult` collections (camelCase), so every struct here round-trips
//! through the driver unchanged.

pub mod db;

mod exam;
mod question;
mod result;

pub use exam::Exam;
pub use question::{Difficulty, Question, QuestionKind};
pub use result::{AnswerEntry, ExamResult, ResultStatus};
