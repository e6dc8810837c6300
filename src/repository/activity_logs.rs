//! Activity logs repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::activity_log::{ActivityAction, ActivityLogDetails, ActivityLogEntry},
};

#[derive(Clone)]
pub struct ActivityLogsRepository {
    pool: Pool<Postgres>,
}

impl ActivityLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append an audit entry. Pure insert; referenced ids may dangle later
    /// without affecting retrieval.
    pub async fn append(
        &self,
        user_id: Option<Uuid>,
        book_id: Option<Uuid>,
        action: ActivityAction,
        message: &str,
    ) -> AppResult<ActivityLogEntry> {
        let entry = sqlx::query_as::<_, ActivityLogEntry>(
            r#"
            INSERT INTO activity_logs (id, user_id, book_id, action, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(action.as_str())
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Newest entries first, left-joined with current display names so a
    /// deleted user or book shows as absent instead of breaking the read
    pub async fn list(&self, limit: i64) -> AppResult<Vec<ActivityLogDetails>> {
        let entries = sqlx::query_as::<_, ActivityLogDetails>(
            r#"
            SELECT l.*, u.name AS user_name, u.email AS user_email, b.title AS book_title
            FROM activity_logs l
            LEFT JOIN users u ON u.id = l.user_id
            LEFT JOIN books b ON b.id = l.book_id
            ORDER BY l.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
