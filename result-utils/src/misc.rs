use models::Exam;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where an exam sits relative to its scheduled window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamWindow {
    Draft,
    Scheduled,
    Ongoing,
    Completed,
}

/// Validate an exam before it is published:
/// - `title` is not empty
/// - `total_marks` is positive
/// - `passing_marks` is between 0 and `total_marks`
/// - `duration_in_m` is positive
pub fn validate_exam(exam: &Exam) -> Result<(), Error> {
    if exam.title.trim().is_empty() {
        return Err(Error::Validation(format!("exam {} has an empty title", exam.id)));
    }

    if exam.total_marks <= 0 {
        return Err(Error::Validation(format!(
            "exam {} total marks must be positive, got {}",
            exam.id, exam.total_marks
        )));
    }

    if exam.passing_marks < 0 || exam.passing_marks > exam.total_marks {
        return Err(Error::Validation(format!(
            "exam {} passing marks {} must be between 0 and {}",
            exam.id, exam.passing_marks, exam.total_marks
        )));
    }

    if exam.duration_in_m <= 0 {
        return Err(Error::Validation(format!(
            "exam {} duration must be positive, got {}m",
            exam.id, exam.duration_in_m
        )));
    }

    Ok(())
}

/// Derives the scheduling window for an exam at `now`. Unpublished exams
/// are drafts regardless of their schedule.
pub fn exam_window(exam: &Exam, now: DateTime) -> ExamWindow {
    if !exam.is_published {
        return ExamWindow::Draft;
    }

    let start_time_in_ms = exam.date_time.timestamp_millis();
    let end_time_in_ms = start_time_in_ms + exam.duration_in_m * 60_000;
    let now_in_ms = now.timestamp_millis();

    if now_in_ms < start_time_in_ms {
        ExamWindow::Scheduled
    } else if now_in_ms > end_time_in_ms {
        ExamWindow::Completed
    } else {
        ExamWindow::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;

    use super::*;

    fn exam(total_marks: i64, passing_marks: i64, duration_in_m: i64) -> Exam {
        Exam {
            id: ObjectId::new(),
            title: "Trade Proficiency".to_string(),
            description: None,
            trade: "DMV".to_string(),
            level: "L2".to_string(),
            skill: "Draughtsman".to_string(),
            date_time: DateTime::from_millis(1_700_000_000_000),
            duration_in_m,
            total_marks,
            passing_marks,
            instructions: None,
            questions: vec![],
            created_by: ObjectId::new(),
            is_active: true,
            is_published: true,
            publish_date: None,
        }
    }

    #[test]
    fn valid_exam_passes() {
        validate_exam(&exam(100, 40, 120)).unwrap();
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(validate_exam(&exam(0, 0, 120)).is_err());
        assert!(validate_exam(&exam(100, 101, 120)).is_err());
        assert!(validate_exam(&exam(100, -1, 120)).is_err());
        assert!(validate_exam(&exam(100, 40, 0)).is_err());

        let mut untitled = exam(100, 40, 120);
        untitled.title = "  ".to_string();
        assert!(validate_exam(&untitled).is_err());
    }

    #[test]
    fn window_boundaries() {
        let e = exam(100, 40, 120);
        let start = e.date_time.timestamp_millis();
        let end = start + 120 * 60_000;

        assert_eq!(
            exam_window(&e, DateTime::from_millis(start - 1)),
            ExamWindow::Scheduled
        );
        assert_eq!(
            exam_window(&e, DateTime::from_millis(start)),
            ExamWindow::Ongoing
        );
        assert_eq!(
            exam_window(&e, DateTime::from_millis(end)),
            ExamWindow::Ongoing
        );
        assert_eq!(
            exam_window(&e, DateTime::from_millis(end + 1)),
            ExamWindow::Completed
        );
    }

    #[test]
    fn unpublished_exam_is_a_draft() {
        let mut e = exam(100, 40, 120);
        e.is_published = false;
        assert_eq!(exam_window(&e, DateTime::now()), ExamWindow::Draft);
    }
}
