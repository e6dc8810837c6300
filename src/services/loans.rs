//! Loan workflow service: the borrow/return state machine.
//!
//! Owns the loan-exclusivity invariant (at most one BORROWED loan per
//! (user, book) pair) and orchestrates the copy-count adjustment against
//! the catalog so neither can drift from the other.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        activity_log::ActivityAction,
        loan::{BorrowRequest, Loan, LoanDetails, LoanStatus},
        user::UserClaims,
    },
    repository::Repository,
};

/// Loan duration applied when the borrower does not pick a due date
const DEFAULT_LOAN_DAYS: i64 = 14;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the acting user.
    ///
    /// The loan insert and the availability decrement run in one
    /// transaction: if the decrement guard fails (the last copy was taken
    /// between the availability pre-check and the write), the loan row is
    /// rolled back with it.
    pub async fn borrow_book(&self, actor: &UserClaims, request: BorrowRequest) -> AppResult<Loan> {
        // The token is verified, but the account may have been removed since
        let user = self.repository.users.get_by_id(actor.sub).await?;

        let book = self.repository.books.get_by_id(request.book_id).await?;

        if book.available_copies <= 0 {
            return Err(AppError::Validation(
                "No copies are available for borrowing".to_string(),
            ));
        }

        let existing = self
            .repository
            .loans
            .find_active_by_user_and_book(actor.sub, request.book_id)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "You already borrowed this book and have not returned it yet".to_string(),
            ));
        }

        let now = Utc::now();
        let due_at = request
            .due_at
            .unwrap_or_else(|| now + Duration::days(DEFAULT_LOAN_DAYS));
        if due_at <= now {
            return Err(AppError::Validation(
                "Due date must be in the future".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;

        let loan = self
            .repository
            .loans
            .create_in_tx(&mut *tx, actor.sub, request.book_id, now, due_at)
            .await?;

        let decremented = self
            .repository
            .books
            .decrement_available_in_tx(&mut *tx, request.book_id)
            .await?;
        if decremented.is_none() {
            tx.rollback().await?;
            return Err(AppError::Validation(
                "Unable to update book availability".to_string(),
            ));
        }

        tx.commit().await?;

        self.log_activity(
            actor.sub,
            Some(book.id),
            ActivityAction::BorrowBook,
            &format!("{} borrowed {}", user.email, book.title),
        )
        .await;

        Ok(loan)
    }

    /// Return a borrowed book. Owner or admin only; BORROWED -> RETURNED
    /// is the sole permitted transition.
    pub async fn return_book(&self, actor: &UserClaims, loan_id: Uuid) -> AppResult<Loan> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;

        if loan.status != LoanStatus::Borrowed {
            return Err(AppError::Validation(
                "Loan has already been closed".to_string(),
            ));
        }

        if !actor.is_admin() && loan.user_id != actor.sub {
            return Err(AppError::Authorization(
                "You cannot return a loan that you did not borrow".to_string(),
            ));
        }

        let updated = self
            .repository
            .loans
            .mark_returned(loan_id, Utc::now())
            .await?
            .ok_or_else(|| {
                // Lost a race with a concurrent return of the same loan
                AppError::Validation("Loan has already been closed".to_string())
            })?;

        // Bounded by total_copies: if inventory shrank while the copy was
        // out, the shelf is already full and the increment is skipped.
        if self
            .repository
            .books
            .increment_available(loan.book_id)
            .await?
            .is_none()
        {
            tracing::warn!(
                book_id = %loan.book_id,
                loan_id = %loan.id,
                "returned copy had no room in inventory; total_copies shrank while it was on loan"
            );
        }

        self.log_activity(
            actor.sub,
            Some(loan.book_id),
            ActivityAction::ReturnBook,
            &format!("{} returned loan {}", actor.email, loan.id),
        )
        .await;

        Ok(updated)
    }

    /// Loans of the acting user, newest borrowed first
    pub async fn list_my_loans(&self, actor: &UserClaims) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.list_by_user(actor.sub).await
    }

    /// All loans, admin only
    pub async fn list_all_loans(&self, actor: &UserClaims) -> AppResult<Vec<LoanDetails>> {
        actor.require_admin()?;
        self.repository.loans.list_all().await
    }

    /// Audit append is observability, not part of the loan invariant: a
    /// failure is logged, never propagated into an already-committed
    /// operation.
    async fn log_activity(
        &self,
        user_id: Uuid,
        book_id: Option<Uuid>,
        action: ActivityAction,
        message: &str,
    ) {
        if let Err(e) = self
            .repository
            .activity_logs
            .append(Some(user_id), book_id, action, message)
            .await
        {
            tracing::warn!("Failed to append {} audit entry: {}", action, e);
        }
    }
}
