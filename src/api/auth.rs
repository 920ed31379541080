//! Account endpoints: registration, login and the caller's own profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use super::{require, ApiJson};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{
    coalesce, AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, NewUser,
    RegisterRequest, Role, UpdateProfileRequest, User,
};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Routes that need the `protect` layer.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/password", put(change_password))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

async fn hash(password: String) -> Result<String, AppError> {
    hash_password_blocking(password)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// A corrupt stored hash is treated like a wrong password.
async fn password_matches(password: String, hash: String) -> bool {
    verify_password_blocking(password, hash)
        .await
        .unwrap_or(false)
}

fn with_token(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(AuthResponse { user, token })
}

/// POST /api/auth/register - Create a regular user account.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    require(&request.name, "Name is required")?;
    require(&request.email, "Email is required")?;
    require(&request.password, "Password is required")?;

    let password_hash = hash(request.password).await?;
    let user = state
        .repo
        .create_user(&NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(with_token(&state, user)?)))
}

/// POST /api/auth/login - Exchange email and password for a token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let stored = state
        .repo
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;

    if !password_matches(request.password, stored.password_hash).await {
        tracing::debug!("Failed login for user {}", stored.user.id);
        return Err(invalid());
    }

    Ok(Json(with_token(&state, stored.user)?))
}

/// GET /api/auth/profile - The authenticated user.
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<User>, AppError> {
    let stored = state
        .repo
        .get_user(&current.id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(stored.user))
}

/// PUT /api/auth/profile - Update the authenticated user.
///
/// Returns the updated user with a freshly issued token.
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let stored = state
        .repo
        .get_user(&current.id)
        .await?
        .ok_or_else(user_not_found)?;

    let password_hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => hash(password.to_string()).await?,
        None => stored.password_hash,
    };

    let existing = stored.user;
    let merged = User {
        name: coalesce(request.name.as_deref(), &existing.name),
        email: coalesce(request.email.as_deref(), &existing.email),
        photo: coalesce(request.photo.as_deref(), &existing.photo),
        ..existing
    };

    let user = state
        .repo
        .save_user(&merged, &password_hash)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(with_token(&state, user)?))
}

/// PUT /api/auth/password - Change the authenticated user's password.
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    require(&request.current_password, "Current password is required")?;
    require(&request.new_password, "New password is required")?;

    let stored = state
        .repo
        .get_user(&current.id)
        .await?
        .ok_or_else(user_not_found)?;

    if !password_matches(request.current_password, stored.password_hash).await {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash(request.new_password).await?;
    state
        .repo
        .save_user(&stored.user, &new_hash)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!("Password changed for user {}", current.id);
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
