//! Quiz collection.

use sqlx::{sqlite::SqliteRow, Row};

use super::repository::{new_id, Repository};
use crate::errors::AppError;
use crate::models::{Quiz, Status};

const QUIZ_COLUMNS: &str = "id, question, answer, category, status";

impl Repository {
    /// List all quizzes in insertion order.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM quizzes ORDER BY rowid",
            QUIZ_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(quiz_from_row).collect())
    }

    /// Get a quiz by ID.
    pub async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM quizzes WHERE id = ?", QUIZ_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(quiz_from_row))
    }

    /// Insert a new quiz.
    pub async fn create_quiz(
        &self,
        question: &str,
        answer: &str,
        category: Option<&str>,
        status: Status,
    ) -> Result<Quiz, AppError> {
        let id = new_id();

        sqlx::query(
            "INSERT INTO quizzes (id, question, answer, category, status) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(question)
        .bind(answer)
        .bind(category)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(Quiz {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.map(str::to_string),
            status,
        })
    }

    /// Persist every field of an already merged quiz.
    ///
    /// Returns `false` when no row has the quiz's ID.
    pub async fn save_quiz(&self, quiz: &Quiz) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE quizzes SET question = ?, answer = ?, category = ?, status = ? WHERE id = ?",
        )
        .bind(&quiz.question)
        .bind(&quiz.answer)
        .bind(&quiz.category)
        .bind(quiz.status.as_str())
        .bind(&quiz.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a quiz. Returns `false` when it did not exist.
    pub async fn delete_quiz(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn quiz_from_row(row: &SqliteRow) -> Quiz {
    let status: String = row.get("status");
    Quiz {
        id: row.get("id"),
        question: row.get("question"),
        answer: row.get("answer"),
        category: row.get("category"),
        status: Status::from_str(&status).unwrap_or_default(),
    }
}
