use sqlx::PgPool;
use uuid::Uuid;

use crate::admin::password::PasswordHash;
use crate::models::admin::AdminRow;

pub async fn list(pool: &PgPool) -> Result<Vec<AdminRow>, sqlx::Error> {
    sqlx::query_as::<_, AdminRow>("SELECT * FROM admins ORDER BY created_at ASC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminRow>, sqlx::Error> {
    sqlx::query_as::<_, AdminRow>("SELECT * FROM admins WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Returns `None` when the username is already taken.
pub async fn insert(
    pool: &PgPool,
    username: &str,
    password: &PasswordHash,
) -> Result<Option<AdminRow>, sqlx::Error> {
    sqlx::query_as::<_, AdminRow>(
        r#"
        INSERT INTO admins (id, username, password_salt, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(&password.salt)
    .bind(&password.hash)
    .fetch_optional(pool)
    .await
}
