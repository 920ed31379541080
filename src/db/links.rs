//! Link collection.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, Repository};
use crate::errors::AppError;
use crate::models::Link;

const LINK_COLUMNS: &str = "id, title, url, sort_order, category";

impl Repository {
    /// List all links ordered by `order`, ties broken by insertion order.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM links ORDER BY sort_order ASC, rowid ASC",
            LINK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(link_from_row).collect())
    }

    /// Get a link by ID.
    pub async fn get_link(&self, id: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM links WHERE id = ?", LINK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(link_from_row))
    }

    /// Insert a new link.
    pub async fn create_link(
        &self,
        title: &str,
        url: &str,
        order: i64,
        category: Option<&str>,
    ) -> Result<Link, AppError> {
        let id = new_id();

        sqlx::query(
            "INSERT INTO links (id, title, url, sort_order, category) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(title)
        .bind(url)
        .bind(order)
        .bind(category)
        .execute(&self.pool)
        .await?;

        Ok(Link {
            id,
            title: title.to_string(),
            url: url.to_string(),
            order,
            category: category.map(str::to_string),
        })
    }

    /// Persist a merged link. Returns `false` when it did not exist.
    pub async fn save_link(&self, link: &Link) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE links SET title = ?, url = ?, sort_order = ?, category = ? WHERE id = ?",
        )
        .bind(&link.title)
        .bind(&link.url)
        .bind(link.order)
        .bind(&link.category)
        .bind(&link.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a link. Returns `false` when it did not exist.
    pub async fn delete_link(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn link_from_row(row: &SqliteRow) -> Link {
    Link {
        id: row.get("id"),
        title: row.get("title"),
        url: row.get("url"),
        order: row.get("sort_order"),
        category: row.get("category"),
    }
}
