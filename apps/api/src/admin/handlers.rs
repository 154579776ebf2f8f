use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::admin::password::verify_password;
use crate::admin::repository;
use crate::admin::session::{bearer_token, SessionStore};
use crate::errors::AppError;
use crate::models::admin::AdminView;
use crate::state::AppState;

fn sessions(state: &AppState) -> SessionStore {
    SessionStore::new(state.redis.clone(), state.config.session_ttl_secs)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Identifiants invalides".to_string())
}

/// GET /api/admin/list
pub async fn handle_list_admins(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let admins: Vec<AdminView> = repository::list(&state.db)
        .await?
        .into_iter()
        .map(AdminView::from)
        .collect();
    Ok(Json(json!({ "success": true, "admins": admins })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Login attempt for {}", req.username);
    let Some(admin) = repository::find_by_username(&state.db, &req.username).await? else {
        return Err(invalid_credentials());
    };
    if !verify_password(&req.password, &admin.password_salt, &admin.password_hash) {
        warn!("Rejected password for {}", admin.username);
        return Err(invalid_credentials());
    }

    let token = sessions(&state).create(&admin.username).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Connexion réussie",
        "user": { "username": admin.username },
        "token": token,
    })))
}

/// GET /api/admin/session
pub async fn handle_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
    let username = sessions(&state)
        .username(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session expired".to_string()))?;
    Ok(Json(json!({ "success": true, "user": { "username": username } })))
}

/// POST /api/admin/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        sessions(&state).revoke(token).await?;
    }
    Ok(Json(json!({ "success": true })))
}
