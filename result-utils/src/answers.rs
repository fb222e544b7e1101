use models::{AnswerEntry, Question};
use tracing::trace;

use crate::error::Error;

/// Marks each objective answer entry against the question bank.
///
/// Entries for `mcq` and `fill` questions get `is_correct` and the
/// question's full marks on a match. Subjective kinds (`short`, `long`)
/// are left unmarked for the evaluator. The returned objective total is
/// informational: component marks remain the only inputs to a result's
/// total.
pub fn grade_answers(questions: &[Question], answers: &mut [AnswerEntry]) -> Result<f64, Error> {
    let mut objective_total = 0.0;

    for entry in answers.iter_mut() {
        let question = questions
            .iter()
            .find(|q| q.id == entry.question_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "question {} is not part of the exam question bank",
                    entry.question_id
                ))
            })?;

        if !question.kind.is_objective() {
            trace!(question = %question.id, "skipping subjective question");
            continue;
        }

        let correct = entry
            .selected_answer
            .as_deref()
            .map(|selected| answers_match(&question.correct_answer, selected))
            .unwrap_or(false);

        entry.is_correct = correct;
        entry.marks_awarded = if correct { question.marks as f64 } else { 0.0 };
        objective_total += entry.marks_awarded;
    }

    Ok(objective_total)
}

/// Submitted answers are compared trimmed and case-insensitively.
pub fn answers_match(correct_answer: &str, selected_answer: &str) -> bool {
    correct_answer
        .trim()
        .eq_ignore_ascii_case(selected_answer.trim())
}
