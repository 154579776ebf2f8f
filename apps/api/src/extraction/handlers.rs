use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::candidates::handlers::{store_cv, CV_RULE};
use crate::errors::AppError;
use crate::extraction::form_text::preview;
use crate::extraction::jobs::{ExtractionJob, JobStore};
use crate::extraction::pipeline::{self, ExtractionError};
use crate::llm_client::LlmClient;
use crate::state::AppState;
use crate::uploads;

const PREVIEW_CHARS: usize = 500;

fn job_store(state: &AppState) -> JobStore {
    JobStore::new(state.redis.clone(), state.config.extract_job_ttl_secs)
}

/// POST /api/extract
///
/// Stores the CV, then extracts in the background. Poll
/// `/api/extract/status/:job_id` for the result.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let file = uploads::require_file(&mut multipart, CV_RULE, "No PDF file uploaded").await?;
    info!("Processing CV: {}", file.file_name);
    let pdf = file.bytes.clone();
    let (file_name, cv_url) = store_cv(&state.storage, file).await?;

    let job_id = Uuid::new_v4().to_string();
    let jobs = job_store(&state);
    jobs.put(&job_id, &ExtractionJob::Pending).await?;

    tokio::spawn(run_job(
        jobs,
        state.llm.clone(),
        job_id.clone(),
        pdf,
        file_name.clone(),
        cv_url.clone(),
    ));

    Ok(Json(json!({
        "success": true,
        "jobId": job_id,
        "fileName": file_name,
        "cvUrl": cv_url,
    })))
}

async fn run_job(
    jobs: JobStore,
    llm: LlmClient,
    job_id: String,
    pdf: Bytes,
    file_name: String,
    cv_url: String,
) {
    let outcome = extract(&llm, pdf).await;
    let job = match outcome {
        Ok((data, text)) => {
            info!("Extraction job {job_id} finished");
            ExtractionJob::Done {
                data,
                file_name,
                cv_url,
                pdf_text: preview(&text, PREVIEW_CHARS).to_string(),
            }
        }
        Err(e) => {
            error!("Extraction job {job_id} failed: {e}");
            ExtractionJob::Error {
                error: e.to_string(),
            }
        }
    };
    if let Err(e) = jobs.put(&job_id, &job).await {
        error!("Could not record result of extraction job {job_id}: {e}");
    }
}

async fn extract(
    llm: &LlmClient,
    pdf: Bytes,
) -> Result<(serde_json::Map<String, Value>, String), ExtractionError> {
    let text = pipeline::pdf_text(pdf).await?;
    info!("PDF parsed, text length: {}", text.len());
    let data = pipeline::extract_profile(llm, &text).await?;
    Ok((data, text))
}

/// GET /api/extract/status/:job_id
pub async fn handle_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let job = job_store(&state)
        .get(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Extraction job not found".to_string()))?;

    let mut body = serde_json::to_value(job).map_err(anyhow::Error::from)?;
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(body))
}

/// GET /api/extract/health
pub async fn handle_llm_health(State(state): State<AppState>) -> Json<Value> {
    match state.llm.list_models().await {
        Ok(count) => Json(json!({
            "success": true,
            "ollamaRunning": true,
            "modelCount": count,
        })),
        Err(e) => {
            error!("Ollama health check failed: {e}");
            Json(json!({
                "success": true,
                "ollamaRunning": false,
                "error": e.to_string(),
            }))
        }
    }
}
