//! Site setting API endpoints. Settings are addressed by key, not ID.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{require, ApiJson};
use crate::errors::AppError;
use crate::models::{
    coalesce_opt, non_empty, CreateSettingRequest, MessageResponse, Setting,
    UpdateSettingRequest,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings).post(create_setting))
        .route(
            "/settings/{key}",
            get(get_setting).put(update_setting).delete(delete_setting),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Setting not found".to_string())
}

/// GET /api/settings - List all settings by ascending key.
pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<Setting>>, AppError> {
    Ok(Json(state.repo.list_settings().await?))
}

/// GET /api/settings/{key} - Get a single setting.
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    let setting = state.repo.get_setting(&key).await?.ok_or_else(not_found)?;
    Ok(Json(setting))
}

/// POST /api/settings - Create a new setting.
pub async fn create_setting(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateSettingRequest>,
) -> Result<(StatusCode, Json<Setting>), AppError> {
    require(&request.key, "Key is required")?;

    let setting = state
        .repo
        .create_setting(
            &request.key,
            non_empty(request.value.as_deref()),
            non_empty(request.description.as_deref()),
        )
        .await?;

    tracing::info!("Created setting {}", setting.key);
    Ok((StatusCode::CREATED, Json(setting)))
}

/// PUT /api/settings/{key} - Update a setting's value or description.
pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(request): ApiJson<UpdateSettingRequest>,
) -> Result<Json<Setting>, AppError> {
    let existing = state.repo.get_setting(&key).await?.ok_or_else(not_found)?;

    let setting = Setting {
        value: coalesce_opt(request.value.as_deref(), existing.value.as_deref()),
        description: coalesce_opt(
            request.description.as_deref(),
            existing.description.as_deref(),
        ),
        ..existing
    };

    if !state.repo.save_setting(&setting).await? {
        return Err(not_found());
    }
    Ok(Json(setting))
}

/// DELETE /api/settings/{key} - Delete a setting.
pub async fn delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_setting(&key).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted setting {}", key);
    Ok(Json(MessageResponse::new("Setting deleted successfully")))
}
