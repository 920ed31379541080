//! Link API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use url::Url;

use super::{require, ApiJson};
use crate::errors::AppError;
use crate::models::{
    coalesce, coalesce_opt, non_empty, CreateLinkRequest, Link, MessageResponse,
    UpdateLinkRequest,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links).post(create_link))
        .route(
            "/links/{id}",
            get(get_link).put(update_link).delete(delete_link),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Link not found".to_string())
}

/// Reject anything that is not an absolute URL.
fn validate_url(raw: &str) -> Result<(), AppError> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| AppError::Validation(format!("Invalid URL `{}`: {}", raw, e)))
}

/// GET /api/links - List all links by ascending `order`.
pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<Link>>, AppError> {
    Ok(Json(state.repo.list_links().await?))
}

/// GET /api/links/{id} - Get a single link.
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Link>, AppError> {
    let link = state.repo.get_link(&id).await?.ok_or_else(not_found)?;
    Ok(Json(link))
}

/// POST /api/links - Create a new link. `order` defaults to 0.
pub async fn create_link(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Link>), AppError> {
    require(&request.title, "Title is required")?;
    require(&request.url, "URL is required")?;
    validate_url(&request.url)?;

    let link = state
        .repo
        .create_link(
            &request.title,
            &request.url,
            request.order.unwrap_or(0),
            non_empty(request.category.as_deref()),
        )
        .await?;

    tracing::info!("Created link {}", link.id);
    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT /api/links/{id} - Update a link.
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateLinkRequest>,
) -> Result<Json<Link>, AppError> {
    if let Some(url) = non_empty(request.url.as_deref()) {
        validate_url(url)?;
    }
    let existing = state.repo.get_link(&id).await?.ok_or_else(not_found)?;

    let link = Link {
        title: coalesce(request.title.as_deref(), &existing.title),
        url: coalesce(request.url.as_deref(), &existing.url),
        // 0 is indistinguishable from "not provided"
        order: request.order.filter(|o| *o != 0).unwrap_or(existing.order),
        category: coalesce_opt(request.category.as_deref(), existing.category.as_deref()),
        id,
    };

    if !state.repo.save_link(&link).await? {
        return Err(not_found());
    }
    Ok(Json(link))
}

/// DELETE /api/links/{id} - Delete a link.
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_link(&id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted link {}", id);
    Ok(Json(MessageResponse::new("Link deleted successfully")))
}
