//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails, LoanStatus},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Find the active loan a user holds on a book, if any
    pub async fn find_active_by_user_and_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 AND book_id = $2 AND status = $3 LIMIT 1",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(LoanStatus::Borrowed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Insert a new BORROWED loan inside a caller-owned transaction.
    ///
    /// A concurrent duplicate borrow trips the partial unique index on
    /// active (user_id, book_id) pairs and surfaces as `Conflict`.
    pub async fn create_in_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        book_id: Uuid,
        borrowed_at: DateTime<Utc>,
        due_at: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, user_id, book_id, status, borrowed_at, due_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(LoanStatus::Borrowed)
        .bind(borrowed_at)
        .bind(due_at)
        .fetch_one(conn)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(
                "You already borrowed this book and have not returned it yet".to_string(),
            ),
            other => other,
        })?;

        Ok(loan)
    }

    /// Conditionally close a loan: the status guard and the write are one
    /// atomic UPDATE, so only a single return can ever succeed. `None`
    /// means the loan was no longer BORROWED.
    pub async fn mark_returned(
        &self,
        id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET status = $3, returned_at = $2
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .bind(LoanStatus::Returned)
        .bind(LoanStatus::Borrowed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Loans of one user with display fields, newest borrowed first
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.*, u.name AS user_name, u.email AS user_email,
                   b.title AS book_title, b.author AS book_author
            FROM loans l
            JOIN users u ON u.id = l.user_id
            JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1
            ORDER BY l.borrowed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// All loans with display fields, newest borrowed first
    pub async fn list_all(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.*, u.name AS user_name, u.email AS user_email,
                   b.title AS book_title, b.author AS book_author
            FROM loans l
            JOIN users u ON u.id = l.user_id
            JOIN books b ON b.id = l.book_id
            ORDER BY l.borrowed_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
