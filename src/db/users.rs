//! User accounts.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, now, Repository};
use crate::errors::{unique_violation, AppError};
use crate::models::{NewUser, Role, User, UserCredentials};

const USER_COLUMNS: &str = "id, name, email, photo, role, password_hash, created_at, updated_at";

pub const DUPLICATE_USER_EMAIL: &str = "User already exists";

impl Repository {
    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user by email, for login.
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Insert a new user. A taken email is reported as a conflict.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let id = new_id();
        let now = now();

        sqlx::query(
            "INSERT INTO users (id, name, email, photo, role, password_hash, created_at, updated_at) VALUES (?, ?, ?, '', ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .bind(&new_user.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_USER_EMAIL))?;

        Ok(User {
            id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            photo: String::new(),
            role: new_user.role,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Persist a merged user and password hash, refreshing `updated_at`.
    pub async fn save_user(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let updated_at = now();

        let result = sqlx::query(
            "UPDATE users SET name = ?, email = ?, photo = ?, role = ?, password_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.photo)
        .bind(user.role.as_str())
        .bind(password_hash)
        .bind(&updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_USER_EMAIL))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(User {
            updated_at,
            ..user.clone()
        }))
    }
}

fn user_from_row(row: &SqliteRow) -> UserCredentials {
    let role: String = row.get("role");
    UserCredentials {
        user: User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            photo: row.get("photo"),
            role: Role::from_str(&role).unwrap_or_default(),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        },
        password_hash: row.get("password_hash"),
    }
}
