use models::{Exam, ExamResult};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The three evaluator-awarded component scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentMarks {
    pub theory: f64,
    pub practical: f64,
    pub viva: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub total: f64,
    pub percentage: Option<f64>,
}

/// Derives `(total, percentage)` from the component marks and the owning
/// exam's capacity.
///
/// Negative or non-finite components are rejected, not clamped. The
/// percentage is left unset unless the capacity is known and positive;
/// rounding is a presentation concern and not applied here.
pub fn compute_scoring(
    marks: &ComponentMarks,
    total_marks_capacity: Option<i64>,
) -> Result<Scoring, Error> {
    for (name, value) in [
        ("theory", marks.theory),
        ("practical", marks.practical),
        ("viva", marks.viva),
    ] {
        if !value.is_finite() {
            return Err(Error::Validation(format!(
                "{name} marks must be a finite number, got {value}"
            )));
        }
        if value < 0.0 {
            return Err(Error::Validation(format!(
                "{name} marks must not be negative, got {value}"
            )));
        }
    }

    let total = marks.theory + marks.practical + marks.viva;

    let percentage = match total_marks_capacity {
        Some(capacity) if capacity > 0 => Some(100.0 * total / capacity as f64),
        _ => None,
    };

    Ok(Scoring { total, percentage })
}

/// Recomputes a result's stored total and percentage from its current
/// component marks. Runs immediately before every save so the derived
/// fields are never stale relative to the components.
pub fn apply_scoring(result: &mut ExamResult, exam: Option<&Exam>) -> Result<(), Error> {
    let marks = ComponentMarks {
        theory: result.theory_marks,
        practical: result.practical_marks,
        viva: result.viva_marks,
    };
    let scoring = compute_scoring(&marks, exam.map(|e| e.total_marks))?;

    result.total_marks = scoring.total;
    result.percentage = scoring.percentage;

    Ok(())
}
