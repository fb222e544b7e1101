use models::{AnswerEntry, Exam, ExamResult};
use mongodb::{
    Collection,
    bson::{DateTime, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
};

use result_utils::{
    error::Error,
    lifecycle::{self, PassOutcome},
    scoring::{ComponentMarks, apply_scoring},
};

/// Creates the single `pending` result for an (exam, candidate) pair.
///
/// The unique index on `(examId, candidateId)` makes a second creation for
/// the same pair fail; that is reported as a conflict, never merged.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn create_result(
    result_collection: &Collection<ExamResult>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
    answers: Vec<AnswerEntry>,
) -> Result<ExamResult, Error> {
    let mut result = ExamResult::new(exam_id, candidate_id);
    result.answers = answers;

    match result_collection.insert_one(&result).await {
        Ok(_) => Ok(result),
        Err(e) if is_duplicate_key_error(&e) => Err(Error::Conflict(format!(
            "result already exists for exam {exam_id} and candidate {candidate_id}"
        ))),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip_all, err(Debug))]
pub async fn load_result(
    result_collection: &Collection<ExamResult>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
) -> Result<ExamResult, Error> {
    result_collection
        .find_one(doc! {"examId": exam_id, "candidateId": candidate_id})
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no result for exam {exam_id} and candidate {candidate_id}"
            ))
        })
}

async fn load_exam(
    exam_collection: &Collection<Exam>,
    exam_id: ObjectId,
) -> Result<Exam, Error> {
    exam_collection
        .find_one(doc! {"_id": exam_id})
        .await?
        .ok_or_else(|| Error::NotFound(format!("exam {exam_id} does not exist")))
}

/// Records an evaluator's component marks and persists the result.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn record_evaluation(
    result_collection: &Collection<ExamResult>,
    exam_collection: &Collection<Exam>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
    marks: ComponentMarks,
    evaluated_by: ObjectId,
    feedback: Option<String>,
) -> Result<ExamResult, Error> {
    let mut result = load_result(result_collection, exam_id, candidate_id).await?;
    let exam = load_exam(exam_collection, exam_id).await?;

    lifecycle::record_evaluation(&mut result, marks, &exam, evaluated_by, feedback)?;
    save_result(result_collection, &mut result, Some(&exam)).await?;

    Ok(result)
}

#[tracing::instrument(skip_all, err(Debug))]
pub async fn approve_result(
    result_collection: &Collection<ExamResult>,
    exam_collection: &Collection<Exam>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
    approved_by: ObjectId,
) -> Result<ExamResult, Error> {
    let mut result = load_result(result_collection, exam_id, candidate_id).await?;
    let exam = exam_collection.find_one(doc! {"_id": exam_id}).await?;

    lifecycle::approve(&mut result, approved_by)?;
    save_result(result_collection, &mut result, exam.as_ref()).await?;

    Ok(result)
}

#[tracing::instrument(skip_all, err(Debug))]
pub async fn reject_result(
    result_collection: &Collection<ExamResult>,
    exam_collection: &Collection<Exam>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
    rejected_by: ObjectId,
    feedback: Option<String>,
) -> Result<ExamResult, Error> {
    let mut result = load_result(result_collection, exam_id, candidate_id).await?;
    let exam = exam_collection.find_one(doc! {"_id": exam_id}).await?;

    lifecycle::reject(&mut result, rejected_by, feedback)?;
    save_result(result_collection, &mut result, exam.as_ref()).await?;

    Ok(result)
}

/// Read-side pass/fail for display. Never mutates the record; the outcome
/// is derived fresh on every call.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn classify_result(
    result_collection: &Collection<ExamResult>,
    exam_collection: &Collection<Exam>,
    exam_id: ObjectId,
    candidate_id: ObjectId,
) -> Result<PassOutcome, Error> {
    let result = load_result(result_collection, exam_id, candidate_id).await?;
    let exam = exam_collection.find_one(doc! {"_id": exam_id}).await?;

    Ok(lifecycle::classify(&result, exam.as_ref()))
}

/// Persists a result.
///
/// The stored total and percentage are recomputed from the current
/// components here, so they can never go stale relative to what produced
/// them. The write is a compare-and-swap on the record version; a
/// concurrent writer surfaces as a conflict for the caller to retry.
#[tracing::instrument(skip_all, fields(result = %result.id), err(Debug))]
pub async fn save_result(
    result_collection: &Collection<ExamResult>,
    result: &mut ExamResult,
    exam: Option<&Exam>,
) -> Result<(), Error> {
    apply_scoring(result, exam)?;
    result.updated_at = DateTime::now();

    let mut document = mongodb::bson::to_document(result)?;
    document.remove("_id");
    document.insert("version", result.version + 1);

    let update_result = result_collection
        .update_one(
            doc! {"_id": result.id, "version": result.version},
            doc! {"$set": document},
        )
        .await?;

    if update_result.matched_count == 0 {
        return Err(Error::Conflict(format!(
            "result {} version {} was modified concurrently",
            result.id, result.version
        )));
    }

    result.version += 1;

    Ok(())
}

fn is_duplicate_key_error(error: &mongodb::error::Error) -> bool {
    matches!(
        &*error.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
