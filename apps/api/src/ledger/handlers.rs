use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::candidates::parse_id;
use crate::errors::AppError;
use crate::ledger::{repository, Ledger};
use crate::state::AppState;

const ARCHIVE_NOT_FOUND: &str = "Archive record not found";

/// Fields a client may not set on a ledger entry.
fn sanitize(ledger: Ledger, body: Value) -> Result<Map<String, Value>, AppError> {
    let mut data = match body {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(AppError::Validation(
                "Request body must be a JSON object".to_string(),
            ))
        }
    };
    data.remove("_id");
    data.remove("id");
    data.remove(ledger.timestamp_field());
    Ok(data)
}

/// The archive keeps a fixed set of fields, each defaulting to "".
fn archive_fields(body: &Value) -> Map<String, Value> {
    ["Nom", "Prenom", "service", "cvUrl"]
        .into_iter()
        .map(|key| {
            let value = body
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            (key.to_string(), Value::String(value))
        })
        .collect()
}

async fn list(state: &AppState, ledger: Ledger) -> Result<Json<Value>, AppError> {
    let rows = repository::list(&state.db, ledger).await?;
    let data: Vec<Value> = rows
        .iter()
        .map(|row| row.to_document(ledger.timestamp_field()))
        .collect();
    Ok(Json(json!({
        "success": true,
        "count": data.len(),
        "data": data,
    })))
}

async fn create(
    state: &AppState,
    ledger: Ledger,
    data: Map<String, Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let row = repository::insert(&state.db, ledger, &data).await?;
    info!("Added {} ledger entry {}", ledger.as_str(), row.id);

    let mut document = row.to_document(ledger.timestamp_field());
    if let Value::Object(map) = &mut document {
        map.insert("id".to_string(), json!(row.id));
    }
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": ledger.created_message(),
            "data": document,
        })),
    ))
}

/// GET /api/archive
pub async fn handle_list_archive(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    list(&state, Ledger::Archive).await
}

/// POST /api/archive
pub async fn handle_create_archive(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let row = repository::insert(&state.db, Ledger::Archive, &archive_fields(&body)).await?;
    info!("Archived {}", row.id);
    Ok(Json(json!({
        "success": true,
        "message": Ledger::Archive.created_message(),
        "data": row.to_document(Ledger::Archive.timestamp_field()),
    })))
}

/// PUT /api/archive/:id
pub async fn handle_update_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let data = sanitize(Ledger::Archive, body)?;
    let row = repository::update(&state.db, Ledger::Archive, id, &data)
        .await?
        .ok_or_else(|| AppError::NotFound(ARCHIVE_NOT_FOUND.to_string()))?;
    Ok(Json(json!({
        "success": true,
        "data": row.to_document(Ledger::Archive.timestamp_field()),
    })))
}

/// DELETE /api/archive/:id
pub async fn handle_delete_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !repository::delete(&state.db, Ledger::Archive, id).await? {
        return Err(AppError::NotFound(
            ARCHIVE_NOT_FOUND.to_string(),
        ));
    }
    Ok(Json(json!({ "success": true })))
}

/// GET /api/refused
pub async fn handle_list_refused(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    list(&state, Ledger::Refused).await
}

/// POST /api/refused
pub async fn handle_create_refused(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Ledger::Refused, sanitize(Ledger::Refused, body)?).await
}

/// GET /api/hiring/embauches
pub async fn handle_list_hired(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    list(&state, Ledger::Hired).await
}

/// POST /api/hiring/embauches
pub async fn handle_create_hired(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Ledger::Hired, sanitize(Ledger::Hired, body)?).await
}

/// GET /api/depart
pub async fn handle_list_departed(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    list(&state, Ledger::Departed).await
}

/// POST /api/depart
pub async fn handle_create_departed(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    create(&state, Ledger::Departed, sanitize(Ledger::Departed, body)?).await
}
