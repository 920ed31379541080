//! Bearer-token authentication and role gating.
//!
//! [`protect`] resolves the `Authorization: Bearer <token>` header to a stored
//! user and attaches a [`CurrentUser`] to the request. [`admin`] runs after it
//! and only lets admins through.

pub mod password;
pub mod token;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::models::Role;
use crate::AppState;

/// Identity resolved by [`protect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Require a valid bearer token belonging to an existing user.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    let token = bearer_token(header_value)
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        AppError::Unauthorized("Not authorized, token failed".to_string())
    })?;

    // The stored role wins over the one in the token, so demotions apply at once.
    let stored = state
        .repo
        .get_user(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        id: stored.user.id,
        role: stored.user.role,
    });

    Ok(next.run(request).await)
}

/// Require the identity attached by [`protect`] to hold the admin role.
pub async fn admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    if !user.is_admin() {
        tracing::debug!("User {} denied admin route", user.id);
        return Err(AppError::Forbidden("Not authorized as an admin".to_string()));
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))
    }
}
