//! Blog post API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{parse_status, require, ApiJson};
use crate::db::NewPost;
use crate::errors::AppError;
use crate::models::{
    coalesce, coalesce_opt, non_empty, CreatePostRequest, MessageResponse, Post,
    UpdatePostRequest, PLACEHOLDER_IMAGE,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

/// GET /api/posts - List all posts.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.repo.list_posts().await?))
}

/// GET /api/posts/{id} - Get a single post.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = state.repo.get_post(&id).await?.ok_or_else(not_found)?;
    Ok(Json(post))
}

/// POST /api/posts - Create a new post.
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    require(&request.title, "Title is required")?;
    require(&request.slug, "Slug is required")?;
    require(&request.content, "Content is required")?;
    let status = parse_status(request.status.as_deref())?.unwrap_or_default();

    let post = state
        .repo
        .create_post(NewPost {
            title: &request.title,
            slug: &request.slug,
            content: &request.content,
            short_description: non_empty(request.short_description.as_deref()),
            thumbnail: non_empty(request.thumbnail.as_deref()).unwrap_or(PLACEHOLDER_IMAGE),
            category: non_empty(request.category.as_deref()),
            status,
        })
        .await?;

    tracing::info!("Created post {} ({})", post.slug, post.id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/posts/{id} - Update a post.
///
/// Changing the slug to one another post already uses is a conflict.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let status = parse_status(request.status.as_deref())?;
    let existing = state.repo.get_post(&id).await?.ok_or_else(not_found)?;

    let merged = Post {
        title: coalesce(request.title.as_deref(), &existing.title),
        slug: coalesce(request.slug.as_deref(), &existing.slug),
        content: coalesce(request.content.as_deref(), &existing.content),
        short_description: coalesce_opt(
            request.short_description.as_deref(),
            existing.short_description.as_deref(),
        ),
        thumbnail: coalesce(request.thumbnail.as_deref(), &existing.thumbnail),
        category: coalesce_opt(request.category.as_deref(), existing.category.as_deref()),
        status: status.unwrap_or(existing.status),
        ..existing
    };

    let post = state.repo.save_post(&merged).await?.ok_or_else(not_found)?;
    Ok(Json(post))
}

/// DELETE /api/posts/{id} - Delete a post.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_post(&id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted post {}", id);
    Ok(Json(MessageResponse::new("Post removed")))
}
