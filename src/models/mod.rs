//! Data models for the dashboard API.
//!
//! Field names match the dashboard client's JSON: camelCase, with the surrogate
//! identifier serialized as `_id`.

mod link;
mod post;
mod post_category;
mod quiz;
mod quiz_category;
mod setting;
mod user;

pub use link::*;
pub use post::*;
pub use post_category::*;
pub use quiz::*;
pub use quiz_category::*;
pub use setting::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Default image for posts and quiz categories.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Publication status shared by quizzes, posts and categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Status::Active),
            "inactive" => Some(Status::Inactive),
            _ => None,
        }
    }
}

/// Confirmation body returned by delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returns the incoming text unless it is absent or empty.
///
/// Updates treat an empty string exactly like a missing field, so a stored
/// value can never be cleared through an update.
pub fn coalesce(incoming: Option<&str>, existing: &str) -> String {
    match incoming {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => existing.to_string(),
    }
}

/// [`coalesce`] for optional stored fields.
pub fn coalesce_opt(incoming: Option<&str>, existing: Option<&str>) -> Option<String> {
    match incoming {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => existing.map(str::to_string),
    }
}

/// Treats an absent or empty optional text as missing.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
