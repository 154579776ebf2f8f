use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub id: Uuid,
    pub username: String,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Admin as listed to clients; credentials never leave the database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminRow> for AdminView {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}
