//! Quiz category API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{parse_status, require, ApiJson};
use crate::errors::AppError;
use crate::models::{
    coalesce, coalesce_opt, non_empty, CreateQuizCategoryRequest, MessageResponse, QuizCategory,
    UpdateQuizCategoryRequest, PLACEHOLDER_IMAGE,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quiz-categories",
            get(list_quiz_categories).post(create_quiz_category),
        )
        .route(
            "/quiz-categories/{id}",
            get(get_quiz_category)
                .put(update_quiz_category)
                .delete(delete_quiz_category),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

/// GET /api/quiz-categories - List all quiz categories.
pub async fn list_quiz_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizCategory>>, AppError> {
    Ok(Json(state.repo.list_quiz_categories().await?))
}

/// GET /api/quiz-categories/{id} - Get a single quiz category.
pub async fn get_quiz_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizCategory>, AppError> {
    let category = state
        .repo
        .get_quiz_category(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(category))
}

/// POST /api/quiz-categories - Create a new quiz category.
///
/// Duplicate names are rejected by the store's unique index in the same
/// statement as the insert.
pub async fn create_quiz_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateQuizCategoryRequest>,
) -> Result<(StatusCode, Json<QuizCategory>), AppError> {
    require(&request.name, "Category name is required")?;
    let status = parse_status(request.status.as_deref())?.unwrap_or_default();

    let category = state
        .repo
        .create_quiz_category(
            &request.name,
            non_empty(request.icon.as_deref()).unwrap_or(PLACEHOLDER_IMAGE),
            non_empty(request.description.as_deref()),
            status,
        )
        .await?;

    tracing::info!("Created quiz category {} ({})", category.name, category.id);
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/quiz-categories/{id} - Update a quiz category.
pub async fn update_quiz_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateQuizCategoryRequest>,
) -> Result<Json<QuizCategory>, AppError> {
    let status = parse_status(request.status.as_deref())?;
    let existing = state
        .repo
        .get_quiz_category(&id)
        .await?
        .ok_or_else(not_found)?;

    let merged = QuizCategory {
        name: coalesce(request.name.as_deref(), &existing.name),
        icon: coalesce(request.icon.as_deref(), &existing.icon),
        description: coalesce_opt(
            request.description.as_deref(),
            existing.description.as_deref(),
        ),
        status: status.unwrap_or(existing.status),
        ..existing
    };

    let category = state
        .repo
        .save_quiz_category(&merged)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(category))
}

/// DELETE /api/quiz-categories/{id} - Delete a quiz category.
pub async fn delete_quiz_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_quiz_category(&id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted quiz category {}", id);
    Ok(Json(MessageResponse::new("Category removed")))
}
