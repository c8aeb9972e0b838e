use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;
use crate::users::store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub telegram_user_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// POST /user
pub async fn handle_upsert_user(
    State(state): State<AppState>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<Json<Value>, AppError> {
    let user = store::upsert_user(
        &state.db,
        &req.telegram_user_id,
        req.username.as_deref(),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
    )
    .await?;

    Ok(Json(json!({ "user": user })))
}

/// GET /user/{userId}
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = store::get_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Пользователь не найден".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

/// GET /stats/{userId}
pub async fn handle_get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<store::UserStats>, AppError> {
    let stats = store::user_stats(&state.db, &user_id).await?;
    Ok(Json(stats))
}
