use models::{Exam, ExamResult, ResultStatus};
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scoring::{ComponentMarks, compute_scoring};

/// Read-side pass/fail derivation. Never stored on the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassOutcome {
    Pass,
    Fail,
    /// The exam reference was absent, so no threshold is known.
    Indeterminate,
}

/// Records an evaluator's component marks on a result.
///
/// Valid from `pending`, and from `evaluated` for corrections. Terminal
/// states refuse. Scoring is recomputed as part of the same mutation.
pub fn record_evaluation(
    result: &mut ExamResult,
    marks: ComponentMarks,
    exam: &Exam,
    evaluated_by: ObjectId,
    feedback: Option<String>,
) -> Result<(), Error> {
    match result.status {
        ResultStatus::Pending | ResultStatus::Evaluated => {}
        ref status => {
            return Err(Error::InvalidStateTransition(format!(
                "cannot evaluate result {} in status {:?}",
                result.id, status
            )));
        }
    }

    let scoring = compute_scoring(&marks, Some(exam.total_marks))?;

    result.theory_marks = marks.theory;
    result.practical_marks = marks.practical;
    result.viva_marks = marks.viva;
    result.total_marks = scoring.total;
    result.percentage = scoring.percentage;
    result.evaluated_by = Some(evaluated_by);
    result.evaluated_at = Some(DateTime::now());
    result.feedback = feedback;
    result.status = ResultStatus::Evaluated;

    Ok(())
}

/// Finalizes an evaluated result. Only valid from `evaluated`.
pub fn approve(result: &mut ExamResult, approved_by: ObjectId) -> Result<(), Error> {
    if result.status != ResultStatus::Evaluated {
        return Err(Error::InvalidStateTransition(format!(
            "cannot approve result {} in status {:?}",
            result.id, result.status
        )));
    }

    result.approved_by = Some(approved_by);
    result.approved_at = Some(DateTime::now());
    result.status = ResultStatus::Approved;

    Ok(())
}

/// Rejects an evaluated result. Only valid from `evaluated`.
pub fn reject(
    result: &mut ExamResult,
    rejected_by: ObjectId,
    feedback: Option<String>,
) -> Result<(), Error> {
    if result.status != ResultStatus::Evaluated {
        return Err(Error::InvalidStateTransition(format!(
            "cannot reject result {} in status {:?}",
            result.id, result.status
        )));
    }

    result.approved_by = Some(rejected_by);
    result.approved_at = Some(DateTime::now());
    if feedback.is_some() {
        result.feedback = feedback;
    }
    result.status = ResultStatus::Rejected;

    Ok(())
}

/// Compares total marks against the exam's passing threshold.
///
/// Recomputed on every read; a result at exactly the threshold passes.
pub fn classify(result: &ExamResult, exam: Option<&Exam>) -> PassOutcome {
    let Some(exam) = exam else {
        return PassOutcome::Indeterminate;
    };

    if result.total_marks >= exam.passing_marks as f64 {
        PassOutcome::Pass
    } else {
        PassOutcome::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exam(total_marks: i64, passing_marks: i64) -> Exam {
        Exam {
            id: ObjectId::new(),
            title: "Trade Proficiency".to_string(),
            description: None,
            trade: "DMV".to_string(),
            level: "L2".to_string(),
            skill: "Draughtsman".to_string(),
            date_time: DateTime::now(),
            duration_in_m: 120,
            total_marks,
            passing_marks,
            instructions: None,
            questions: vec![],
            created_by: ObjectId::new(),
            is_active: true,
            is_published: true,
            publish_date: Some(DateTime::now()),
        }
    }

    fn marks(theory: f64, practical: f64, viva: f64) -> ComponentMarks {
        ComponentMarks {
            theory,
            practical,
            viva,
        }
    }

    #[test]
    fn evaluation_from_pending_sets_scoring_and_stamps() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());
        let evaluator = ObjectId::new();

        record_evaluation(
            &mut result,
            marks(30.0, 5.0, 5.0),
            &exam,
            evaluator,
            Some("neat work".to_string()),
        )
        .unwrap();

        assert_eq!(result.status, ResultStatus::Evaluated);
        assert_eq!(result.total_marks, 40.0);
        assert_eq!(result.percentage, Some(40.0));
        assert_eq!(result.evaluated_by, Some(evaluator));
        assert!(result.evaluated_at.is_some());
        assert_eq!(classify(&result, Some(&exam)), PassOutcome::Pass);
    }

    #[test]
    fn re_evaluation_overwrites_marks() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());

        record_evaluation(&mut result, marks(30.0, 5.0, 5.0), &exam, ObjectId::new(), None)
            .unwrap();
        record_evaluation(&mut result, marks(10.0, 5.0, 5.0), &exam, ObjectId::new(), None)
            .unwrap();

        assert_eq!(result.total_marks, 20.0);
        assert_eq!(result.percentage, Some(20.0));
        assert_eq!(classify(&result, Some(&exam)), PassOutcome::Fail);
    }

    #[test]
    fn evaluation_rejects_negative_marks_without_mutating() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());

        let err =
            record_evaluation(&mut result, marks(-1.0, 5.0, 5.0), &exam, ObjectId::new(), None)
                .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(result.status, ResultStatus::Pending);
        assert_eq!(result.theory_marks, 0.0);
    }

    #[test]
    fn approve_from_pending_is_invalid() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());

        let err = approve(&mut result, ObjectId::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));
        assert_eq!(result.status, ResultStatus::Pending);
    }

    #[test]
    fn approve_from_evaluated_finalizes() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());
        let approver = ObjectId::new();

        record_evaluation(&mut result, marks(30.0, 5.0, 5.0), &exam, ObjectId::new(), None)
            .unwrap();
        approve(&mut result, approver).unwrap();

        assert_eq!(result.status, ResultStatus::Approved);
        assert_eq!(result.approved_by, Some(approver));
        assert!(result.approved_at.is_some());
    }

    #[test]
    fn reject_is_symmetric_to_approve() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());

        let err = reject(&mut result, ObjectId::new(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));

        record_evaluation(&mut result, marks(30.0, 5.0, 5.0), &exam, ObjectId::new(), None)
            .unwrap();
        reject(
            &mut result,
            ObjectId::new(),
            Some("practical sheet missing".to_string()),
        )
        .unwrap();

        assert_eq!(result.status, ResultStatus::Rejected);
        assert_eq!(
            result.feedback.as_deref(),
            Some("practical sheet missing")
        );
    }

    #[test]
    fn terminal_states_refuse_re_evaluation() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());

        record_evaluation(&mut result, marks(30.0, 5.0, 5.0), &exam, ObjectId::new(), None)
            .unwrap();
        approve(&mut result, ObjectId::new()).unwrap();

        let err =
            record_evaluation(&mut result, marks(50.0, 0.0, 0.0), &exam, ObjectId::new(), None)
                .unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));

        let err = approve(&mut result, ObjectId::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));
    }

    #[test]
    fn classify_at_threshold_passes() {
        let exam = sample_exam(100, 40);
        let mut result = ExamResult::new(exam.id, ObjectId::new());
        result.total_marks = 40.0;

        assert_eq!(classify(&result, Some(&exam)), PassOutcome::Pass);

        result.total_marks = 39.9;
        assert_eq!(classify(&result, Some(&exam)), PassOutcome::Fail);
    }

    #[test]
    fn classify_without_exam_is_indeterminate() {
        let mut result = ExamResult::new(ObjectId::new(), ObjectId::new());
        result.total_marks = 100.0;

        assert_eq!(classify(&result, None), PassOutcome::Indeterminate);
    }
}
