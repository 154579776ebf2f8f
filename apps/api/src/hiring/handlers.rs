use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::candidates::{parse_id, repository};
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::RAPPORT_BUCKET;
use crate::uploads::{self, FileRule};

const RAPPORT_RULE: FileRule = FileRule::new(
    "rapportStage",
    uploads::PDF_OR_WORD,
    uploads::DOCUMENT_MAX_BYTES,
);

fn rapport_key(candidate: &str, millis: i64, extension: Option<&str>) -> String {
    format!("rapport-{candidate}-{millis}{}", extension.unwrap_or_default())
}

/// POST /api/hiring/:id/upload-rapport-stage
pub async fn handle_upload_rapport_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    repository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidat not found.".to_string()))?;
    let file = uploads::require_file(&mut multipart, RAPPORT_RULE, "No file uploaded.").await?;

    let key = rapport_key(
        &id.to_string(),
        chrono::Utc::now().timestamp_millis(),
        file.extension(),
    );
    let url = state
        .storage
        .put_public(RAPPORT_BUCKET, &key, file.bytes, &file.content_type)
        .await
        .map_err(AppError::storage)?;

    if !repository::set_rapport_stage_path(&state.db, id, &url).await? {
        return Err(AppError::NotFound("Candidat not found.".to_string()));
    }
    info!("Internship report stored for candidate {id}");

    Ok(Json(json!({
        "success": true,
        "message": "Rapport de stage uploaded successfully.",
        "filePath": url,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapport_key_keeps_extension() {
        assert_eq!(
            rapport_key("abc", 1_700_000_000_000, Some(".docx")),
            "rapport-abc-1700000000000.docx"
        );
        assert_eq!(rapport_key("abc", 1, None), "rapport-abc-1");
    }
}
