//! REST API module.
//!
//! One router per collection. Each handler validates its input, performs a
//! single repository call and returns the record as JSON; every failure is an
//! [`AppError`].

pub mod auth;
pub mod links;
pub mod post_categories;
pub mod posts;
pub mod quiz_categories;
pub mod quizzes;
pub mod settings;

use axum::extract::FromRequest;

use crate::errors::AppError;
use crate::models::Status;

/// JSON body extractor whose rejections use the API's `{message}` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Fail with a validation error when a required text field is blank.
pub(crate) fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Parse an optional status, treating an empty string as not provided.
pub(crate) fn parse_status(value: Option<&str>) -> Result<Option<Status>, AppError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => Status::from_str(raw).map(Some).ok_or_else(|| {
            AppError::Validation(format!(
                "`{}` is not a valid status, expected `active` or `inactive`",
                raw
            ))
        }),
    }
}
