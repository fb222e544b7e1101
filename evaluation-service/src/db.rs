use std::collections::HashMap;

use anyhow::Context;
use futures_util::{StreamExt, TryStreamExt};
use mongodb::{
    IndexModel,
    bson::{DateTime, doc, oid::ObjectId},
    options::IndexOptions,
};
use serde::Deserialize;
use serde_json::json;

use models::{
    Exam, ExamResult, ResultStatus,
    db::{client, get_collection, get_from_cache_or_collection},
};
use result_utils::lifecycle::{self, PassOutcome};

use crate::config::EnvVars;

pub const EXAM_COLLECTION: &str = "Exam";
pub const RESULT_COLLECTION: &str = "ExamResult";

/// Ensures result indexes exist
/// Auto approves evaluated results past the approval window
/// Removes pending results abandoned past the stale window
#[tracing::instrument(skip_all, err(Debug))]
pub async fn run_maintenance(env_vars: &EnvVars) -> anyhow::Result<()> {
    ensure_result_indexes(env_vars).await?;
    auto_approve_evaluated_results(env_vars).await?;
    delete_stale_pending_results(env_vars).await?;
    Ok(())
}

/// The unique `(examId, candidateId)` index is what turns a duplicate
/// result creation into a write error the service reports as a conflict.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn ensure_result_indexes(env_vars: &EnvVars) -> anyhow::Result<()> {
    let client = client(&env_vars.mongodb_uri).await?;
    let result_collection = get_collection::<ExamResult>(&client, RESULT_COLLECTION);

    let unique_pair = IndexModel::builder()
        .keys(doc! {"examId": 1, "candidateId": 1})
        .options(IndexOptions::builder().unique(true).build())
        .build();
    let by_status = IndexModel::builder().keys(doc! {"status": 1}).build();

    result_collection
        .create_indexes([unique_pair, by_status])
        .await
        .context("unable to create result indexes")?;

    Ok(())
}

/// Auto approves evaluated results left unapproved past the window
#[tracing::instrument(skip_all, err(Debug))]
pub async fn auto_approve_evaluated_results(env_vars: &EnvVars) -> anyhow::Result<()> {
    let client = client(&env_vars.mongodb_uri).await?;
    let result_collection = get_collection::<ExamResult>(&client, RESULT_COLLECTION);

    #[derive(Deserialize)]
    struct ExamResultProjection {
        #[serde(rename = "_id")]
        id: ObjectId,
        #[serde(rename = "evaluatedAt")]
        evaluated_at: Option<DateTime>,
        version: i64,
    }
    // Find evaluated results awaiting an approver
    let evaluated_results: Vec<ExamResultProjection> = result_collection
        .clone_with_type::<ExamResultProjection>()
        .find(doc! {
            "status": ResultStatus::Evaluated
        })
        .projection(doc! {"_id": true, "evaluatedAt": true, "version": true})
        .await
        .context("unable to find evaluated results")?
        .try_collect()
        .await
        .context("unable to deserialize evaluated results to projection")?;

    let now = DateTime::now();

    // If a result has been evaluated, and no approver acted inside the
    // window, approve. The approver reference stays unset for auto
    // approvals.
    for result in evaluated_results.iter() {
        let Some(evaluated_at) = result.evaluated_at else {
            tracing::warn!(result = %result.id, "evaluated result without evaluation date");
            continue;
        };
        let expiry_date = evaluated_at.saturating_add_duration(env_vars.approval_window_in_s);
        tracing::debug!(result = %result.id, %expiry_date, "approval expiry");
        if now > expiry_date {
            tracing::info!(result = %result.id, "result auto-approved");
            result_collection
                .update_one(
                    doc! {
                        "_id": result.id,
                        "version": result.version
                    },
                    doc! {
                        "$set": {
                            "feedback": "Auto approved - approval window exceeded",
                            "approvedAt": now,
                            "status": ResultStatus::Approved,
                            "version": result.version + 1
                        }
                    },
                )
                .await
                .context("unable to auto-approve result")?;
        }
    }

    Ok(())
}

/// Removes pending results whose candidate never got evaluated inside the
/// stale window. Re-registration creates a fresh record.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn delete_stale_pending_results(env_vars: &EnvVars) -> anyhow::Result<()> {
    let client = client(&env_vars.mongodb_uri).await?;
    let result_collection = get_collection::<ExamResult>(&client, RESULT_COLLECTION);

    let stale_window = chrono::Duration::from_std(env_vars.stale_result_window_in_s)
        .context("stale result window out of range")?;
    let cutoff = chrono::Utc::now() - stale_window;
    tracing::info!(%cutoff);

    let delete_result = result_collection
        .delete_many(doc! {
            "status": ResultStatus::Pending,
            "createdAt": {
                "$lt": DateTime::from_millis(cutoff.timestamp_millis())
            }
        })
        .await
        .context("unable to delete stale pending results")?;

    tracing::info!(
        num = delete_result.deleted_count,
        "deleted stale pending results",
    );

    Ok(())
}

/// Joins every result with its exam and emits report rows carrying the
/// freshly computed pass/fail outcome. The outcome is derived here rather
/// than read from the record; it is never stored.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn export_results(env_vars: &EnvVars) -> anyhow::Result<Vec<serde_json::Value>> {
    let client = client(&env_vars.mongodb_uri).await?;
    let result_collection = get_collection::<ExamResult>(&client, RESULT_COLLECTION);
    let exam_collection = get_collection::<Exam>(&client, EXAM_COLLECTION);

    let mut results_cursor = result_collection
        .find(doc! {})
        .await
        .context("unable to find results")?;

    let mut exams: HashMap<ObjectId, Exam> = HashMap::new();
    let mut rows = vec![];

    while let Some(result) = results_cursor.next().await {
        let result = result.context("unable to deserialize result")?;

        let exam = get_from_cache_or_collection(
            &exam_collection,
            doc! {"_id": &result.exam_id},
            &mut exams,
            result.exam_id,
        )
        .await;

        let outcome = match lifecycle::classify(&result, exam.as_ref()) {
            PassOutcome::Pass => "pass",
            PassOutcome::Fail => "fail",
            PassOutcome::Indeterminate => "indeterminate",
        };

        rows.push(json!({
            "examId": result.exam_id.to_hex(),
            "candidateId": result.candidate_id.to_hex(),
            "totalMarks": result.total_marks,
            "percentage": result.percentage,
            "status": result.status.as_str(),
            "outcome": outcome,
        }));
    }

    tracing::info!(num = rows.len(), "exported result rows");

    Ok(rows)
}
