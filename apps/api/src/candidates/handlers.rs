use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::candidates::patch::{strip_reserved, CandidatePatch};
use crate::candidates::repository::{self, NewCandidate};
use crate::candidates::{not_found, parse_id};
use crate::errors::AppError;
use crate::models::{Candidate, CandidateStatus, EvalStatus, FormStatus, HiringStatus};
use crate::state::AppState;
use crate::storage::{Storage, CV_BUCKET, FORM2_BUCKET};
use crate::uploads::{self, FileRule, UploadedFile};

pub const CV_RULE: FileRule = FileRule::new("cv", uploads::PDF_ONLY, uploads::CV_MAX_BYTES);
const FORM2_RULE: FileRule =
    FileRule::new("form2File", uploads::PDF_OR_WORD, uploads::DOCUMENT_MAX_BYTES);

/// Stores an uploaded CV as `<millis>-<encoded name>` and returns (key, public url).
pub async fn store_cv(storage: &Storage, file: UploadedFile) -> Result<(String, String), AppError> {
    let key = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        urlencoding::encode(&file.file_name)
    );
    let url = storage
        .put_public(CV_BUCKET, &key, file.bytes, uploads::PDF_MIME)
        .await
        .map_err(AppError::storage)?;
    Ok((key, url))
}

/// Workflow columns a new candidate always starts with defaults for.
const SAVE_DEFAULTED_KEYS: [&str; 5] =
    ["status", "hiringStatus", "formStatus", "evalStatus", "formSubmittedAt"];

/// Splits a `/save` body into the free-form profile and the CV location.
fn saved_profile(body: Value) -> Result<(Map<String, Value>, Option<String>), AppError> {
    let Value::Object(mut profile) = body else {
        return Err(AppError::Validation("Request body must be a JSON object".to_string()));
    };
    let original_cv_path = profile
        .remove("originalCvMinioPath")
        .and_then(|v| v.as_str().map(str::to_string))
        .filter(|s| !s.is_empty());
    for key in SAVE_DEFAULTED_KEYS {
        profile.remove(key);
    }
    strip_reserved(&mut profile);
    Ok((profile, original_cv_path))
}

/// POST /api/candidates/save
pub async fn handle_save(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let (profile, original_cv_path) = saved_profile(body)?;

    let candidate = repository::insert(
        &state.db,
        &NewCandidate {
            profile,
            status: CandidateStatus::Pending,
            hiring_status: HiringStatus::AwaitingClient,
            form_status: FormStatus::Submitted,
            form_token: None,
            eval_status: EvalStatus::Inactive,
            original_cv_path,
        },
    )
    .await?;
    info!("Saved candidate {} from CV data", candidate.id);

    Ok(Json(json!({
        "success": true,
        "message": "CV data saved successfully",
        "data": candidate,
    })))
}

/// GET /api/candidates
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let candidates = repository::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "count": candidates.len(),
        "data": candidates,
    })))
}

/// GET /api/candidates/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let candidate = repository::find(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(json!({ "success": true, "data": candidate })))
}

/// GET /api/candidates/token/:token
pub async fn handle_get_by_form_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let candidate = repository::find_by_form_token(&state.db, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found with this token".to_string()))?;
    Ok(Json(json!({ "success": true, "data": candidate })))
}

/// GET /api/candidates/eval/token/:token
pub async fn handle_get_by_eval_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let candidate = repository::find_by_eval_token(&state.db, &token)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Candidate not found with this evaluation token".to_string())
        })?;
    Ok(Json(json!({ "success": true, "data": candidate })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalLookupRequest {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub date_naissance: String,
}

/// POST /api/candidates/eval/lookup
pub async fn handle_eval_lookup(
    State(state): State<AppState>,
    Json(req): Json<EvalLookupRequest>,
) -> Result<Json<Value>, AppError> {
    if [&req.nom, &req.prenom, &req.date_naissance]
        .iter()
        .any(|s| s.trim().is_empty())
    {
        return Err(AppError::Validation(
            "nom, prenom and dateNaissance are required".to_string(),
        ));
    }
    let candidate =
        repository::find_by_identity(&state.db, &req.nom, &req.prenom, &req.date_naissance)
            .await?
            .ok_or_else(not_found)?;
    Ok(Json(json!({
        "success": true,
        "data": eval_gate_view(&candidate),
    })))
}

/// The evaluation token is only disclosed while the evaluation is open.
fn eval_gate_view(candidate: &Candidate) -> Value {
    let token = (candidate.eval_status == EvalStatus::Active.as_str())
        .then(|| candidate.eval_token.clone())
        .flatten();
    json!({
        "_id": candidate.id,
        "evalStatus": candidate.eval_status,
        "evalToken": token,
    })
}

/// PUT /api/candidates/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let patch = CandidatePatch::from_value(body)?;
    if patch.form_status == Some(FormStatus::Active) {
        info!("Activating form for candidate {id}");
    }
    if patch.eval_status == Some(EvalStatus::Active) {
        info!("Activating evaluation for candidate {id}");
    }

    let form_token = patch.form_token_offer();
    let eval_token = patch.eval_token_offer();
    let candidate =
        repository::apply_patch(&state.db, id, &patch, form_token.as_deref(), eval_token.as_deref())
            .await?
            .ok_or_else(not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Updated successfully",
        "data": candidate,
    })))
}

/// PUT /api/candidates/qualified/:id
pub async fn handle_mark_qualified(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !repository::mark_qualified(&state.db, id).await? {
        return Err(not_found());
    }
    Ok(Json(json!({ "success": true, "message": "Candidate marked as qualified" })))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !repository::delete(&state.db, id).await? {
        return Err(not_found());
    }
    info!("Deleted candidate {id}");
    Ok(Json(json!({ "success": true, "message": "Candidate deleted successfully" })))
}

/// POST /api/candidates/upload-only-cv
pub async fn handle_upload_only_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let file = uploads::require_file(&mut multipart, CV_RULE, "No PDF file uploaded").await?;
    info!("Uploading CV only: {}", file.file_name);
    let (file_name, cv_url) = store_cv(&state.storage, file).await?;
    Ok(Json(json!({
        "success": true,
        "message": "CV file uploaded successfully",
        "fileName": file_name,
        "cvUrl": cv_url,
    })))
}

/// POST /api/candidates/:id/upload-form2
pub async fn handle_upload_form2(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    repository::find(&state.db, id).await?.ok_or_else(not_found)?;
    let file = uploads::require_file(&mut multipart, FORM2_RULE, "No file uploaded.").await?;

    let key = format!(
        "form2-{}-{}{}",
        id,
        chrono::Utc::now().timestamp_millis(),
        file.extension().unwrap_or(".pdf")
    );
    let url = state
        .storage
        .put_public(FORM2_BUCKET, &key, file.bytes, &file.content_type)
        .await
        .map_err(AppError::storage)?;

    if !repository::set_qualified_form_path(&state.db, id, &url).await? {
        return Err(not_found());
    }
    Ok(Json(json!({
        "success": true,
        "message": "Form uploaded successfully.",
        "filePath": url,
    })))
}
