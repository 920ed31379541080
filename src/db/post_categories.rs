//! Blog post category collection.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, Repository};
use crate::errors::{unique_violation, AppError};
use crate::models::{PostCategory, Status};

const CATEGORY_COLUMNS: &str = "id, name, slug, description, status";

pub const DUPLICATE_POST_CATEGORY_SLUG: &str = "Category with this slug already exists";

impl Repository {
    pub async fn list_post_categories(&self) -> Result<Vec<PostCategory>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM post_categories ORDER BY rowid",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_category_from_row).collect())
    }

    pub async fn get_post_category(&self, id: &str) -> Result<Option<PostCategory>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM post_categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(post_category_from_row))
    }

    pub async fn create_post_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        status: Status,
    ) -> Result<PostCategory, AppError> {
        let id = new_id();

        sqlx::query(
            "INSERT INTO post_categories (id, name, slug, description, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_POST_CATEGORY_SLUG))?;

        Ok(PostCategory {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.map(str::to_string),
            status,
        })
    }

    pub async fn save_post_category(&self, category: &PostCategory) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE post_categories SET name = ?, slug = ?, description = ?, status = ? WHERE id = ?",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.status.as_str())
        .bind(&category.id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_POST_CATEGORY_SLUG))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_post_category(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM post_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn post_category_from_row(row: &SqliteRow) -> PostCategory {
    let status: String = row.get("status");
    PostCategory {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        status: Status::from_str(&status).unwrap_or_default(),
    }
}
