use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::candidates::repository::{self, EvaluationOutcome};
use crate::candidates::tokens::generate_token;
use crate::candidates::{not_found, parse_id};
use crate::errors::AppError;
use crate::evaluation::{answer_key, report};
use crate::models::Candidate;
use crate::pdf::PdfError;
use crate::state::AppState;
use crate::storage::{Storage, FORM3_BUCKET};
use crate::uploads::PDF_MIME;

fn answers_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(AppError::Validation(
            "Answers must be a JSON object keyed by question id".to_string(),
        )),
    }
}

async fn upload_evaluation_pdf(
    storage: &Storage,
    candidate: &Candidate,
    pdf: Vec<u8>,
) -> Result<String, AppError> {
    let key = format!(
        "eval-{}-{}.pdf",
        candidate.last_name().unwrap_or("candidat"),
        chrono::Utc::now().timestamp_millis()
    );
    storage
        .put_public(FORM3_BUCKET, &key, Bytes::from(pdf), PDF_MIME)
        .await
        .map_err(AppError::storage)
}

/// Layout and compression are CPU-bound; keep them off the async workers.
async fn render_pdf<F>(render: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, PdfError> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF renderer crashed: {e}")))?
        .map_err(AppError::from)
}

/// PUT /api/candidates/eval/submit/:id
///
/// Grades the submitted answers against the key, renders the corrected PDF
/// and stores everything on the candidate.
pub async fn handle_submit_and_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let answers = answers_object(body)?;
    let candidate = repository::find(&state.db, id).await?.ok_or_else(not_found)?;

    let grade = answer_key::grade(&answers);
    let pdf = {
        let (name, answers, grade) = (candidate.display_name(), answers.clone(), grade.clone());
        render_pdf(move || report::render_graded(&name, &answers, &grade)).await?
    };
    let pdf_url = upload_evaluation_pdf(&state.storage, &candidate, pdf).await?;

    let outcome = EvaluationOutcome {
        answers: Some(Value::Object(answers)),
        correction: Value::Object(grade.correction),
        score: grade.score as i32,
        pdf_url,
    };
    repository::record_graded_evaluation(&state.db, id, &outcome)
        .await?
        .ok_or_else(not_found)?;
    info!(
        "Graded evaluation for candidate {id}: {}/{}",
        grade.score, grade.total
    );

    Ok(Json(json!({
        "success": true,
        "message": "Evaluation submitted and corrected successfully",
        "evalScore": outcome.score,
        "evalPdfPath": outcome.pdf_url,
    })))
}

/// PATCH /api/forms/eval/submit/:id
///
/// Stores raw answers for a reviewer to correct later.
pub async fn handle_submit_for_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let answers = Value::Object(answers_object(body)?);
    if !repository::record_submitted_answers(&state.db, id, &answers).await? {
        return Err(not_found());
    }
    Ok(Json(json!({ "success": true, "message": "Evaluation submitted" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualCorrectionRequest {
    #[serde(default, alias = "correction")]
    pub eval_correction: Option<Map<String, Value>>,
    #[serde(default, alias = "score")]
    pub eval_score: Option<Value>,
}

/// Reviewer score: a number or numeric string, truncated toward zero.
/// Anything else falls back to the number of questions marked correct.
pub fn resolve_score(score: Option<&Value>, correction: &Map<String, Value>) -> i64 {
    let parsed = match score {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
        .unwrap_or_else(|| {
            correction
                .values()
                .filter(|v| **v == Value::Bool(true))
                .count() as i64
        })
}

/// Rejects scores that cannot be stored or that make no sense as a mark.
pub fn checked_score(score: i64) -> Result<i32, AppError> {
    if score < 0 {
        return Err(AppError::Validation("evalScore must not be negative".to_string()));
    }
    i32::try_from(score).map_err(|_| AppError::Validation("evalScore is out of range".to_string()))
}

/// PATCH /api/admin/eval/correct/:id (also PATCH|PUT /api/candidates/eval/correct/:id)
pub async fn handle_manual_correction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ManualCorrectionRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let correction = req
        .eval_correction
        .ok_or_else(|| AppError::Validation("evalCorrection is required".to_string()))?;
    let score = checked_score(resolve_score(req.eval_score.as_ref(), &correction))?;
    let candidate = repository::find(&state.db, id).await?.ok_or_else(not_found)?;

    let pdf = {
        let name = candidate.display_name();
        let answers = candidate.eval_answers.as_ref().and_then(Value::as_object).cloned();
        let correction = correction.clone();
        render_pdf(move || report::render_manual(&name, answers.as_ref(), &correction, score))
            .await?
    };
    let pdf_url = upload_evaluation_pdf(&state.storage, &candidate, pdf).await?;

    let outcome = EvaluationOutcome {
        answers: None,
        correction: Value::Object(correction),
        score,
        pdf_url,
    };
    repository::record_manual_correction(&state.db, id, &outcome)
        .await?
        .ok_or_else(not_found)?;
    info!("Manual correction saved for candidate {id}: score {score}");

    Ok(Json(json!({ "success": true, "pdfUrl": outcome.pdf_url })))
}

/// PUT /api/hiring/eval/activate/:id
pub async fn handle_activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let candidate = repository::activate_evaluation(&state.db, id, &generate_token())
        .await?
        .ok_or_else(not_found)?;
    info!("Evaluation link issued for candidate {id}");
    Ok(Json(json!({ "success": true, "data": candidate })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correction() -> Map<String, Value> {
        json!({ "q1": true, "q2": false, "q3": true })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_resolve_score_accepts_numbers_and_strings() {
        assert_eq!(resolve_score(Some(&json!(12)), &correction()), 12);
        assert_eq!(resolve_score(Some(&json!("12.00")), &correction()), 12);
        assert_eq!(resolve_score(Some(&json!(" 7.9 ")), &correction()), 7);
    }

    #[test]
    fn test_resolve_score_falls_back_to_true_count() {
        assert_eq!(resolve_score(None, &correction()), 2);
        assert_eq!(resolve_score(Some(&json!("douze")), &correction()), 2);
        assert_eq!(resolve_score(Some(&Value::Null), &correction()), 2);
    }

    #[test]
    fn test_checked_score_bounds() {
        assert_eq!(checked_score(0).unwrap(), 0);
        assert_eq!(checked_score(38).unwrap(), 38);
        assert!(matches!(checked_score(-5), Err(AppError::Validation(_))));
        assert!(matches!(
            checked_score(i64::from(i32::MAX) + 1),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_render_pdf_runs_on_blocking_pool() {
        let bytes = render_pdf(|| report::render_manual("Sara Alami", None, &Map::new(), 0))
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_answers_object() {
        assert!(answers_object(json!({ "q1": "B" })).is_ok());
        assert!(answers_object(Value::Null).unwrap().is_empty());
        assert!(answers_object(json!("B")).is_err());
    }

    #[test]
    fn test_correction_request_aliases() {
        let req: ManualCorrectionRequest =
            serde_json::from_value(json!({ "correction": { "q1": true }, "score": "1" })).unwrap();
        assert!(req.eval_correction.is_some());
        assert_eq!(req.eval_score, Some(json!("1")));
    }
}
