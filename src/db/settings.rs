//! Setting collection, addressed by key.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, Repository};
use crate::errors::{unique_violation, AppError};
use crate::models::Setting;

pub const DUPLICATE_SETTING_KEY: &str = "Setting with this key already exists";

impl Repository {
    /// List all settings ordered by key.
    pub async fn list_settings(&self) -> Result<Vec<Setting>, AppError> {
        let rows = sqlx::query("SELECT id, key, value, description FROM settings ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(setting_from_row).collect())
    }

    /// Get a setting by key.
    pub async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError> {
        let row = sqlx::query("SELECT id, key, value, description FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(setting_from_row))
    }

    /// Insert a new setting. A taken key is reported as a conflict.
    pub async fn create_setting(
        &self,
        key: &str,
        value: Option<&str>,
        description: Option<&str>,
    ) -> Result<Setting, AppError> {
        let id = new_id();

        sqlx::query("INSERT INTO settings (id, key, value, description) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(key)
            .bind(value)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(|e| unique_violation(e, DUPLICATE_SETTING_KEY))?;

        Ok(Setting {
            id,
            key: key.to_string(),
            value: value.map(str::to_string),
            description: description.map(str::to_string),
        })
    }

    /// Persist a merged setting. The key is the lookup and never changes.
    pub async fn save_setting(&self, setting: &Setting) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE settings SET value = ?, description = ? WHERE key = ?")
            .bind(&setting.value)
            .bind(&setting.description)
            .bind(&setting.key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a setting by key. Returns `false` when it did not exist.
    pub async fn delete_setting(&self, key: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn setting_from_row(row: &SqliteRow) -> Setting {
    Setting {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        description: row.get("description"),
    }
}
