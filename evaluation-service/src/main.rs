use evaluation_service::{config::EnvVars, db::run_maintenance};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(sentry::integrations::tracing::layer())
        .with(EnvFilter::from_default_env())
        .init();
    tracing::info!("Starting exam evaluation service...");
    dotenvy::dotenv().ok();

    let env_vars = EnvVars::new();

    let _guard = if let Some(sentry_dsn) = env_vars.sentry_dsn.clone() {
        tracing::info!("initializing Sentry");
        // NOTE: Events are only emitted, once the guard goes out of scope.
        Some(sentry::init((
            sentry_dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(env_vars.environment.to_string().into()),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        )))
    } else {
        None
    };

    let run = run_maintenance(&env_vars);
    let outcome = match env_vars.timeout_secs {
        Some(secs) => {
            match tokio::time::timeout(std::time::Duration::from_secs(secs), run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!("Maintenance run did not finish within {secs}s");
                    return;
                }
            }
        }
        None => run.await,
    };

    if let Err(e) = outcome {
        tracing::error!("Error updating results collection: {:?}", e);
    } else {
        tracing::info!("Successfully updated results collection");
    }
}

// Tests are needed for schema changes
#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;
    use models::{Exam, ExamResult, Question, db};
    use mongodb::bson::doc;

    /// Check if all records in the `Exam` collection are deserializable
    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn exam_schema_is_unchanged() {
        let mongo_uri = std::env::var("MONGODB_URI").unwrap();
        let client = db::client(&mongo_uri).await.unwrap();
        let exam_collection = db::get_collection::<Exam>(&client, "Exam");
        let _exams: Vec<Exam> = exam_collection
            .find(doc! {})
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
    }

    /// Check if all records in the `Question` collection are deserializable
    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn question_schema_is_unchanged() {
        let mongo_uri = std::env::var("MONGODB_URI").unwrap();
        let client = db::client(&mongo_uri).await.unwrap();
        let question_collection = db::get_collection::<Question>(&client, "Question");
        let _questions: Vec<Question> = question_collection
            .find(doc! {})
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
    }

    /// Check if all records in the `ExamResult` collection are deserializable
    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn result_schema_is_unchanged() {
        let mongo_uri = std::env::var("MONGODB_URI").unwrap();
        let client = db::client(&mongo_uri).await.unwrap();
        let result_collection = db::get_collection::<ExamResult>(&client, "ExamResult");
        let _results: Vec<ExamResult> = result_collection
            .find(doc! {})
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
    }
}
