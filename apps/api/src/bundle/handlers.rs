use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::bundle::archive::{attachment_header, build_zip};
use crate::bundle::{collect_documents, fetch_documents};
use crate::candidates::{parse_id, repository};
use crate::errors::AppError;
use crate::state::AppState;

fn no_documents() -> AppError {
    AppError::NotFound("No documents found for this candidate.".to_string())
}

/// GET /api/candidates/:id/download-docs
pub async fn handle_download_documents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let candidate = repository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found.".to_string()))?;

    let entries = collect_documents(&candidate);
    if entries.is_empty() {
        warn!("No documents referenced by candidate {id}");
        return Err(no_documents());
    }

    let files = fetch_documents(&state.storage, entries).await;
    if files.is_empty() {
        return Err(no_documents());
    }

    let zip = build_zip(files.iter().map(|(name, bytes)| (name.as_str(), bytes.as_ref())))
        .map_err(|e| AppError::Internal(e.into()))?;
    info!("Bundled {} documents for candidate {id}", files.len());

    let archive_name = format!("{}_documents.zip", candidate.file_stem());
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, attachment_header(&archive_name)),
        ],
        zip,
    )
        .into_response())
}
