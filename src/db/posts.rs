//! Blog post collection.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, now, Repository};
use crate::errors::{unique_violation, AppError};
use crate::models::{Post, Status};

const POST_COLUMNS: &str = "id, title, slug, content, short_description, thumbnail, category, status, created_at, updated_at";

/// Message returned when a post slug is already taken.
pub const DUPLICATE_POST_SLUG: &str = "Post with this slug already exists";

/// Fields of a post before it has an ID or timestamps.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub short_description: Option<&'a str>,
    pub thumbnail: &'a str,
    pub category: Option<&'a str>,
    pub status: Status,
}

impl Repository {
    /// List all posts in insertion order.
    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM posts ORDER BY rowid", POST_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// Insert a new post. A taken slug is reported as a conflict.
    pub async fn create_post(&self, post: NewPost<'_>) -> Result<Post, AppError> {
        let id = new_id();
        let now = now();

        sqlx::query(
            r#"INSERT INTO posts (
                id, title, slug, content, short_description, thumbnail,
                category, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(post.title)
        .bind(post.slug)
        .bind(post.content)
        .bind(post.short_description)
        .bind(post.thumbnail)
        .bind(post.category)
        .bind(post.status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_POST_SLUG))?;

        Ok(Post {
            id,
            title: post.title.to_string(),
            slug: post.slug.to_string(),
            content: post.content.to_string(),
            short_description: post.short_description.map(str::to_string),
            thumbnail: post.thumbnail.to_string(),
            category: post.category.map(str::to_string),
            status: post.status,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Persist a merged post, refreshing `updated_at`.
    pub async fn save_post(&self, post: &Post) -> Result<Option<Post>, AppError> {
        let updated_at = now();

        let result = sqlx::query(
            r#"UPDATE posts SET
                title = ?, slug = ?, content = ?, short_description = ?,
                thumbnail = ?, category = ?, status = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.short_description)
        .bind(&post.thumbnail)
        .bind(&post.category)
        .bind(post.status.as_str())
        .bind(&updated_at)
        .bind(&post.id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_POST_SLUG))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Post {
            updated_at,
            ..post.clone()
        }))
    }

    /// Delete a post. Returns `false` when it did not exist.
    pub async fn delete_post(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn post_from_row(row: &SqliteRow) -> Post {
    let status: String = row.get("status");
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        short_description: row.get("short_description"),
        thumbnail: row.get("thumbnail"),
        category: row.get("category"),
        status: Status::from_str(&status).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
