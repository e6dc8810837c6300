//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Book model from database.
///
/// Invariant: `0 <= available_copies <= total_copies`, enforced by the
/// catalog service on every mutation and by a CHECK constraint in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Copies currently out on loan
    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 120, message = "Genre must be 1-120 characters"))]
    pub genre: String,
    #[validate(length(min = 1, max = 64, message = "ISBN must be 1-64 characters"))]
    pub isbn: String,
    #[validate(range(min = 0, message = "Total copies must be zero or greater"))]
    pub total_copies: i32,
    pub description: Option<String>,
}

/// Update book request; unspecified fields keep their previous values
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Genre must be 1-120 characters"))]
    pub genre: Option<String>,
    #[validate(length(min = 1, max = 64, message = "ISBN must be 1-64 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 0, message = "Total copies must be zero or greater"))]
    pub total_copies: Option<i32>,
    pub description: Option<String>,
}

/// Catalog search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookSearchQuery {
    /// Substring match on title, author or ISBN (case-insensitive)
    pub term: Option<String>,
    /// Substring match on genre
    pub genre: Option<String>,
}
