use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::candidates::repository::{self, NewCandidate};
use crate::candidates::tokens::generate_token;
use crate::candidates::{not_found, parse_id};
use crate::errors::AppError;
use crate::forms::{questionnaire, template};
use crate::models::{CandidateStatus, EvalStatus, FormStatus, HiringStatus};
use crate::state::AppState;
use crate::storage::FORM2_BUCKET;
use crate::uploads::PDF_MIME;

#[derive(Debug, Default, Deserialize)]
pub struct FormLinkRequest {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub questionnaire: String,
}

/// POST /api/forms/generate-form-link
pub async fn handle_generate_form_link(
    State(state): State<AppState>,
    Json(req): Json<FormLinkRequest>,
) -> Result<Json<Value>, AppError> {
    let token = generate_token();
    let candidate = repository::insert(
        &state.db,
        &NewCandidate {
            profile: template::blank_profile(&req.service, &req.questionnaire),
            status: CandidateStatus::Pending,
            hiring_status: HiringStatus::AwaitingForm,
            form_status: FormStatus::Active,
            form_token: Some(token.clone()),
            eval_status: EvalStatus::Inactive,
            original_cv_path: None,
        },
    )
    .await?;
    info!(
        "Form link generated for candidate {} (service: {})",
        candidate.id, req.service
    );

    Ok(Json(json!({
        "success": true,
        "message": "Form link generated successfully",
        "formToken": token,
        "formLink": format!("/create-candidate/{token}"),
        "candidateId": candidate.id,
    })))
}

/// GET /api/forms/token/:token
pub async fn handle_get_by_form_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let Some(candidate) = repository::find_by_form_token(&state.db, &token).await? else {
        warn!("No candidate found for form token {token}");
        return Err(AppError::NotFound("Invalid or expired link".to_string()));
    };
    Ok(Json(json!({ "success": true, "data": candidate })))
}

/// GET /api/forms/eval/token/:token
pub async fn handle_get_by_eval_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let Some(candidate) = repository::find_by_eval_token(&state.db, &token).await? else {
        warn!("No candidate found for evaluation token {token}");
        return Err(AppError::NotFound(
            "Evaluation link invalid or expired".to_string(),
        ));
    };
    Ok(Json(json!({ "success": true, "data": candidate })))
}

/// PATCH /api/forms/qualified/:id
///
/// Renders the submitted recruitment questionnaire to PDF and attaches it
/// to the candidate.
pub async fn handle_submit_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let form = body.as_object().cloned().unwrap_or_default();
    let candidate = repository::find(&state.db, id).await?.ok_or_else(not_found)?;

    let now = Utc::now();
    let full_name = candidate.file_stem();
    let pdf = questionnaire::render(&full_name, &now.format("%d/%m/%Y").to_string(), &form)?;

    let key = format!("form-{}-{}.pdf", full_name, now.timestamp_millis());
    let pdf_url = state
        .storage
        .put_public(FORM2_BUCKET, &key, Bytes::from(pdf), PDF_MIME)
        .await
        .map_err(AppError::storage)?;

    if !repository::record_submitted_form(&state.db, id, &pdf_url, now).await? {
        return Err(not_found());
    }
    info!("Recruitment questionnaire stored for candidate {id}");

    Ok(Json(json!({
        "success": true,
        "message": "Formulaire enregistré et PDF généré avec succès",
        "pdfUrl": pdf_url,
    })))
}
