//! Post category API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{parse_status, require, ApiJson};
use crate::errors::AppError;
use crate::models::{
    coalesce, coalesce_opt, non_empty, CreatePostCategoryRequest, MessageResponse, PostCategory,
    UpdatePostCategoryRequest,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/post-categories",
            get(list_post_categories).post(create_post_category),
        )
        .route(
            "/post-categories/{id}",
            get(get_post_category)
                .put(update_post_category)
                .delete(delete_post_category),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

pub async fn list_post_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostCategory>>, AppError> {
    Ok(Json(state.repo.list_post_categories().await?))
}

pub async fn get_post_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostCategory>, AppError> {
    let category = state
        .repo
        .get_post_category(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(category))
}

pub async fn create_post_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePostCategoryRequest>,
) -> Result<(StatusCode, Json<PostCategory>), AppError> {
    require(&request.name, "Category name is required")?;
    require(&request.slug, "Slug is required")?;
    let status = parse_status(request.status.as_deref())?.unwrap_or_default();

    let category = state
        .repo
        .create_post_category(
            &request.name,
            &request.slug,
            non_empty(request.description.as_deref()),
            status,
        )
        .await?;

    tracing::info!("Created post category {} ({})", category.slug, category.id);
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_post_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePostCategoryRequest>,
) -> Result<Json<PostCategory>, AppError> {
    let status = parse_status(request.status.as_deref())?;
    let existing = state
        .repo
        .get_post_category(&id)
        .await?
        .ok_or_else(not_found)?;

    let category = PostCategory {
        name: coalesce(request.name.as_deref(), &existing.name),
        slug: coalesce(request.slug.as_deref(), &existing.slug),
        description: coalesce_opt(
            request.description.as_deref(),
            existing.description.as_deref(),
        ),
        status: status.unwrap_or(existing.status),
        id,
    };

    if !state.repo.save_post_category(&category).await? {
        return Err(not_found());
    }
    Ok(Json(category))
}

pub async fn delete_post_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_post_category(&id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted post category {}", id);
    Ok(Json(MessageResponse::new("Category removed")))
}
