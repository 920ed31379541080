//! Quiz Dashboard Backend
//!
//! REST backend for the content admin dashboard: quizzes, posts, their
//! categories, links and site settings, with SQLite persistence and bearer
//! token authentication.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;

use std::sync::Arc;

use axum::{
    error_handling::HandleErrorLayer, extract::State, middleware, routing::get, BoxError, Router,
};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::password::hash_password_blocking;
use auth::token::TokenKeys;
use config::{AdminBootstrap, Config};
use db::Repository;
use errors::AppError;
use models::{NewUser, Role};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub tokens: Arc<TokenKeys>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Repository, config: Config) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_expires_in_secs);
        Self {
            repo: Arc::new(repo),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = match &state.config.cors_origins {
        None => CorsLayer::new().allow_origin(Any),
        Some(origins) => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // Content management: protect runs first, then admin
    let admin_routes = Router::new()
        .merge(api::quizzes::routes())
        .merge(api::quiz_categories::routes())
        .merge(api::posts::routes())
        .merge(api::post_categories::routes())
        .route_layer(middleware::from_fn(auth::admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::protect));

    // Any signed-in user
    let protected_routes = Router::new()
        .merge(api::links::routes())
        .merge(api::settings::routes())
        .merge(api::auth::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::protect));

    let api_routes = Router::new()
        .merge(admin_routes)
        .merge(protected_routes)
        .merge(api::auth::public_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(state.config.request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "Admin Dashboard API is running"
}

/// Turn failures raised by the middleware stack into the usual error body.
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout("Request timed out".to_string())
    } else {
        AppError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.repo.ping().await?;
    Ok("OK")
}

/// Create the configured admin account unless its email is already taken.
///
/// Returns `true` when a new account was created.
pub async fn bootstrap_admin(repo: &Repository, admin: &AdminBootstrap) -> Result<bool, AppError> {
    if let Some(existing) = repo.find_user_by_email(&admin.email).await? {
        if existing.user.role != Role::Admin {
            tracing::warn!(
                "Bootstrap email {} belongs to a non-admin user; leaving it unchanged",
                admin.email
            );
        }
        return Ok(false);
    }

    let password_hash = hash_password_blocking(admin.password.clone())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let created = repo
        .create_user(&NewUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!("Created admin account {} ({})", user.email, user.id);
            Ok(true)
        }
        // Another instance created it first.
        Err(AppError::Conflict(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests;
