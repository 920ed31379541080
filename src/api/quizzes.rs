//! Quiz API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{parse_status, require, ApiJson};
use crate::errors::AppError;
use crate::models::{
    coalesce, coalesce_opt, non_empty, CreateQuizRequest, MessageResponse, Quiz,
    UpdateQuizRequest,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes).post(create_quiz))
        .route(
            "/quizzes/{id}",
            get(get_quiz).put(update_quiz).delete(delete_quiz),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Quiz not found".to_string())
}

/// GET /api/quizzes - List all quizzes.
pub async fn list_quizzes(State(state): State<AppState>) -> Result<Json<Vec<Quiz>>, AppError> {
    Ok(Json(state.repo.list_quizzes().await?))
}

/// GET /api/quizzes/{id} - Get a single quiz.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quiz>, AppError> {
    let quiz = state.repo.get_quiz(&id).await?.ok_or_else(not_found)?;
    Ok(Json(quiz))
}

/// POST /api/quizzes - Create a new quiz.
pub async fn create_quiz(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), AppError> {
    require(&request.question, "Question is required")?;
    require(&request.answer, "Answer is required")?;
    let status = parse_status(request.status.as_deref())?.unwrap_or_default();

    let quiz = state
        .repo
        .create_quiz(
            &request.question,
            &request.answer,
            non_empty(request.category.as_deref()),
            status,
        )
        .await?;

    tracing::info!("Created quiz {}", quiz.id);
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// PUT /api/quizzes/{id} - Update a quiz.
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateQuizRequest>,
) -> Result<Json<Quiz>, AppError> {
    let status = parse_status(request.status.as_deref())?;
    let existing = state.repo.get_quiz(&id).await?.ok_or_else(not_found)?;

    let quiz = Quiz {
        question: coalesce(request.question.as_deref(), &existing.question),
        answer: coalesce(request.answer.as_deref(), &existing.answer),
        category: coalesce_opt(request.category.as_deref(), existing.category.as_deref()),
        status: status.unwrap_or(existing.status),
        id,
    };

    if !state.repo.save_quiz(&quiz).await? {
        return Err(not_found());
    }
    Ok(Json(quiz))
}

/// DELETE /api/quizzes/{id} - Delete a quiz.
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.repo.delete_quiz(&id).await? {
        return Err(not_found());
    }

    tracing::info!("Deleted quiz {}", id);
    Ok(Json(MessageResponse::new("Quiz removed")))
}
