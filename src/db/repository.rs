//! Database repository shared by every resource router.
//!
//! The collection-specific operations live in sibling modules as further
//! `impl Repository` blocks.

use chrono::Utc;
use sqlx::SqlitePool;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check that the store answers queries.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Generate a surrogate identifier for a new record.
pub(super) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 timestamp.
pub(super) fn now() -> String {
    Utc::now().to_rfc3339()
}
