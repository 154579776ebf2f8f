use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::ledger::Ledger;
use crate::models::ledger::LedgerEntryRow;

pub async fn list(pool: &PgPool, ledger: Ledger) -> Result<Vec<LedgerEntryRow>, sqlx::Error> {
    sqlx::query_as::<_, LedgerEntryRow>(
        "SELECT * FROM ledger_entries WHERE ledger = $1 ORDER BY recorded_at DESC",
    )
    .bind(ledger.as_str())
    .fetch_all(pool)
    .await
}

pub async fn insert(
    pool: &PgPool,
    ledger: Ledger,
    data: &Map<String, Value>,
) -> Result<LedgerEntryRow, sqlx::Error> {
    sqlx::query_as::<_, LedgerEntryRow>(
        "INSERT INTO ledger_entries (id, ledger, data) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(ledger.as_str())
    .bind(Json(data))
    .fetch_one(pool)
    .await
}

/// Merges `data` into the stored fields.
pub async fn update(
    pool: &PgPool,
    ledger: Ledger,
    id: Uuid,
    data: &Map<String, Value>,
) -> Result<Option<LedgerEntryRow>, sqlx::Error> {
    sqlx::query_as::<_, LedgerEntryRow>(
        "UPDATE ledger_entries SET data = data || $3 WHERE id = $1 AND ledger = $2 RETURNING *",
    )
    .bind(id)
    .bind(ledger.as_str())
    .bind(Json(data))
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, ledger: Ledger, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ledger_entries WHERE id = $1 AND ledger = $2")
        .bind(id)
        .bind(ledger.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
