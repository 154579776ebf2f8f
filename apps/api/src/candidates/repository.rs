//! SQL access for the `candidates` table. Every query returns full rows so
//! handlers can hand the document straight back to the client.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::candidates::patch::CandidatePatch;
use crate::models::candidate::{BIRTH_DATE_KEY, FIRST_NAME_ALT_KEY, FIRST_NAME_KEY, LAST_NAME_KEY};
use crate::models::{Candidate, CandidateStatus, EvalStatus, FormStatus, HiringStatus};

pub type DbResult<T> = Result<T, sqlx::Error>;

/// Fields required to create a candidate row.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub profile: Map<String, Value>,
    pub status: CandidateStatus,
    pub hiring_status: HiringStatus,
    pub form_status: FormStatus,
    pub form_token: Option<String>,
    pub eval_status: EvalStatus,
    pub original_cv_path: Option<String>,
}

/// Result of an automatic or manual evaluation correction.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub answers: Option<Value>,
    pub correction: Value,
    pub score: i32,
    pub pdf_url: String,
}

pub async fn insert(pool: &PgPool, new: &NewCandidate) -> DbResult<Candidate> {
    sqlx::query_as::<_, Candidate>(
        r#"
        INSERT INTO candidates
            (id, profile, status, hiring_status, form_status, form_token, eval_status, original_cv_path)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(Json(&new.profile))
    .bind(new.status.as_str())
    .bind(new.hiring_status.as_str())
    .bind(new.form_status.as_str())
    .bind(new.form_token.as_deref())
    .bind(new.eval_status.as_str())
    .bind(new.original_cv_path.as_deref())
    .fetch_one(pool)
    .await
}

/// All candidates, newest first.
pub async fn list(pool: &PgPool) -> DbResult<Vec<Candidate>> {
    sqlx::query_as::<_, Candidate>("SELECT * FROM candidates ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_form_token(pool: &PgPool, token: &str) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE form_token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_eval_token(pool: &PgPool, token: &str) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE eval_token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await
}

/// Identity match for the evaluation gate: trimmed, case-insensitive on the
/// names, trimmed exact on the birth date. Most recent candidate wins.
pub async fn find_by_identity(
    pool: &PgPool,
    last_name: &str,
    first_name: &str,
    birth_date: &str,
) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>(
        r#"
        SELECT * FROM candidates
        WHERE lower(trim(profile->>$1)) = lower(trim($4))
          AND lower(trim(COALESCE(profile->>$2, profile->>$3))) = lower(trim($5))
          AND trim(profile->>$6) = trim($7)
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(LAST_NAME_KEY)
    .bind(FIRST_NAME_KEY)
    .bind(FIRST_NAME_ALT_KEY)
    .bind(last_name)
    .bind(first_name)
    .bind(BIRTH_DATE_KEY)
    .bind(birth_date)
    .fetch_optional(pool)
    .await
}

/// Applies a validated patch. An offered token is only stored when the row
/// has none yet.
pub async fn apply_patch(
    pool: &PgPool,
    id: Uuid,
    patch: &CandidatePatch,
    form_token: Option<&str>,
    eval_token: Option<&str>,
) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>(
        r#"
        UPDATE candidates SET
            profile = profile || $2,
            status = COALESCE($3, status),
            hiring_status = COALESCE($4, hiring_status),
            form_status = COALESCE($5, form_status),
            eval_status = COALESCE($6, eval_status),
            form_token = COALESCE(form_token, $7),
            eval_token = COALESCE(eval_token, $8),
            original_cv_path = COALESCE($9, original_cv_path),
            form_submitted_at = COALESCE($10, form_submitted_at),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(Json(&patch.profile))
    .bind(patch.status.map(CandidateStatus::as_str))
    .bind(patch.hiring_status.map(HiringStatus::as_str))
    .bind(patch.form_status.map(FormStatus::as_str))
    .bind(patch.eval_status.map(EvalStatus::as_str))
    .bind(form_token)
    .bind(eval_token)
    .bind(patch.original_cv_path.as_deref())
    .bind(patch.form_submitted_at)
    .fetch_optional(pool)
    .await
}

/// Returns false when the candidate does not exist.
pub async fn mark_qualified(pool: &PgPool, id: Uuid) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE candidates SET qualified = true, qualified_at = now(), updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_all(pool: &PgPool) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM candidates").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Stores an automatically graded evaluation and its PDF.
pub async fn record_graded_evaluation(
    pool: &PgPool,
    id: Uuid,
    outcome: &EvaluationOutcome,
) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>(
        r#"
        UPDATE candidates SET
            eval_answers = $2,
            eval_correction = $3,
            eval_score = $4,
            eval_pdf_path = $5,
            eval_status = 'corrected',
            eval_submitted_at = now(),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&outcome.answers)
    .bind(&outcome.correction)
    .bind(outcome.score)
    .bind(&outcome.pdf_url)
    .fetch_optional(pool)
    .await
}

/// Stores a manual correction. Submitted answers are left untouched.
pub async fn record_manual_correction(
    pool: &PgPool,
    id: Uuid,
    outcome: &EvaluationOutcome,
) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>(
        r#"
        UPDATE candidates SET
            eval_correction = $2,
            eval_score = $3,
            eval_pdf_path = $4,
            eval_status = 'corrected',
            eval_corrected_at = now(),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&outcome.correction)
    .bind(outcome.score)
    .bind(&outcome.pdf_url)
    .fetch_optional(pool)
    .await
}

/// Stores raw answers awaiting manual correction.
pub async fn record_submitted_answers(
    pool: &PgPool,
    id: Uuid,
    answers: &Value,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE candidates SET
            eval_answers = $2,
            eval_status = 'submitted',
            eval_submitted_at = now(),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(answers)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Always replaces the evaluation token, invalidating earlier links.
pub async fn activate_evaluation(
    pool: &PgPool,
    id: Uuid,
    token: &str,
) -> DbResult<Option<Candidate>> {
    sqlx::query_as::<_, Candidate>(
        r#"
        UPDATE candidates SET
            eval_status = 'active',
            eval_token = $2,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Records the rendered recruitment questionnaire and closes the form.
pub async fn record_submitted_form(
    pool: &PgPool,
    id: Uuid,
    pdf_url: &str,
    submitted_at: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE candidates SET
            qualified_form_path = $2,
            form_submitted_at = $3,
            form_status = 'submitted',
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(pdf_url)
    .bind(submitted_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_qualified_form_path(pool: &PgPool, id: Uuid, url: &str) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE candidates SET qualified_form_path = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(url)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_rapport_stage_path(pool: &PgPool, id: Uuid, url: &str) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE candidates SET rapport_stage_path = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(url)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn new_candidate(profile: Value) -> NewCandidate {
        NewCandidate {
            profile: profile.as_object().cloned().unwrap(),
            status: CandidateStatus::Pending,
            hiring_status: HiringStatus::AwaitingClient,
            form_status: FormStatus::Submitted,
            form_token: None,
            eval_status: EvalStatus::Inactive,
            original_cv_path: None,
        }
    }

    fn patch(body: Value) -> CandidatePatch {
        CandidatePatch::from_value(body).unwrap()
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_opening_form_mints_token_once(pool: PgPool) -> sqlx::Result<()> {
        let created = insert(&pool, &new_candidate(json!({ "Nom": "Alami" }))).await?;
        assert!(created.form_token.is_none());

        let opening = patch(json!({ "formStatus": "active" }));
        let first = apply_patch(&pool, created.id, &opening, Some("token-one"), None)
            .await?
            .unwrap();
        assert_eq!(first.form_token.as_deref(), Some("token-one"));
        assert_eq!(first.form_status, "active");
        assert!(first.eval_token.is_none());

        let reopening = apply_patch(&pool, created.id, &opening, Some("token-two"), None)
            .await?
            .unwrap();
        assert_eq!(reopening.form_token.as_deref(), Some("token-one"));

        let closing = patch(json!({ "formStatus": "submitted", "service": "Achats" }));
        let closed = apply_patch(&pool, created.id, &closing, None, None).await?.unwrap();
        assert_eq!(closed.form_token.as_deref(), Some("token-one"));
        assert_eq!(closed.profile_str("service"), Some("Achats"));
        assert_eq!(closed.profile_str("Nom"), Some("Alami"));
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_patch_of_missing_candidate_is_none(pool: PgPool) -> sqlx::Result<()> {
        let missing = apply_patch(&pool, Uuid::new_v4(), &patch(json!({})), None, None).await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres DATABASE_URL"]
    async fn test_identity_match_is_trimmed_and_case_insensitive(pool: PgPool) -> sqlx::Result<()> {
        let sara = insert(
            &pool,
            &new_candidate(json!({
                "Nom": " Alami ",
                "Prénom": "Sara",
                "Date de naissance": "01/02/1998",
            })),
        )
        .await?;
        let omar = insert(
            &pool,
            &new_candidate(json!({
                "Nom": "Drissi",
                "Prenom": "Omar",
                "Date de naissance": "03/04/1990",
            })),
        )
        .await?;

        let found = find_by_identity(&pool, "ALAMI", "  sara", "01/02/1998 ").await?;
        assert_eq!(found.map(|c| c.id), Some(sara.id));

        let found = find_by_identity(&pool, "drissi", "OMAR", "03/04/1990").await?;
        assert_eq!(found.map(|c| c.id), Some(omar.id));

        assert!(find_by_identity(&pool, "Alami", "Sara", "02/01/1998").await?.is_none());
        Ok(())
    }
}
