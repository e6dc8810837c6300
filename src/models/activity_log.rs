//! Activity log (audit trail) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Register,
    Login,
    CreateBook,
    UpdateBook,
    DeleteBook,
    BorrowBook,
    ReturnBook,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Register => "REGISTER",
            ActivityAction::Login => "LOGIN",
            ActivityAction::CreateBook => "CREATE_BOOK",
            ActivityAction::UpdateBook => "UPDATE_BOOK",
            ActivityAction::DeleteBook => "DELETE_BOOK",
            ActivityAction::BorrowBook => "BORROW_BOOK",
            ActivityAction::ReturnBook => "RETURN_BOOK",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit trail entry from database, append-only and immutable once written
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub action: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Audit entry joined with current user/book display names.
///
/// The references are weak: a deleted user or book leaves the display
/// fields absent rather than breaking log retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityLogDetails {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub action: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub book_title: Option<String>,
}

/// Audit listing parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LogQuery {
    /// Maximum entries returned, newest first (default 200)
    pub limit: Option<i64>,
}
