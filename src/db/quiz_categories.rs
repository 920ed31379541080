//! Quiz category collection.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, now, Repository};
use crate::errors::{unique_violation, AppError};
use crate::models::{QuizCategory, Status};

const CATEGORY_COLUMNS: &str = "id, name, icon, description, status, created_at, updated_at";

/// Message returned when a category name is already taken.
pub const DUPLICATE_QUIZ_CATEGORY: &str = "Category already exists";

impl Repository {
    /// List all quiz categories in insertion order.
    pub async fn list_quiz_categories(&self) -> Result<Vec<QuizCategory>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM quiz_categories ORDER BY rowid",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(quiz_category_from_row).collect())
    }

    /// Get a quiz category by ID.
    pub async fn get_quiz_category(&self, id: &str) -> Result<Option<QuizCategory>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM quiz_categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(quiz_category_from_row))
    }

    /// Insert a new quiz category.
    ///
    /// A taken name is rejected by the unique index and reported as a conflict.
    pub async fn create_quiz_category(
        &self,
        name: &str,
        icon: &str,
        description: Option<&str>,
        status: Status,
    ) -> Result<QuizCategory, AppError> {
        let id = new_id();
        let now = now();

        sqlx::query(
            "INSERT INTO quiz_categories (id, name, icon, description, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(icon)
        .bind(description)
        .bind(status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_QUIZ_CATEGORY))?;

        Ok(QuizCategory {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.map(str::to_string),
            status,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Persist a merged quiz category, refreshing `updated_at`.
    pub async fn save_quiz_category(
        &self,
        category: &QuizCategory,
    ) -> Result<Option<QuizCategory>, AppError> {
        let updated_at = now();

        let result = sqlx::query(
            "UPDATE quiz_categories SET name = ?, icon = ?, description = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.description)
        .bind(category.status.as_str())
        .bind(&updated_at)
        .bind(&category.id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_QUIZ_CATEGORY))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(QuizCategory {
            updated_at,
            ..category.clone()
        }))
    }

    /// Delete a quiz category. Returns `false` when it did not exist.
    pub async fn delete_quiz_category(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quiz_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn quiz_category_from_row(row: &SqliteRow) -> QuizCategory {
    let status: String = row.get("status");
    QuizCategory {
        id: row.get("id"),
        name: row.get("name"),
        icon: row.get("icon"),
        description: row.get("description"),
        status: Status::from_str(&status).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
