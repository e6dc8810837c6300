//! Catalog management service.
//!
//! Owns the copy-count invariant (`0 <= available_copies <= total_copies`)
//! and ISBN uniqueness; every book mutation is checked here before it
//! reaches the store.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        activity_log::ActivityAction,
        book::{Book, BookSearchQuery, CreateBookRequest, UpdateBookRequest},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book. Admin only; ISBN must be unique; every copy starts
    /// on the shelf.
    pub async fn create_book(
        &self,
        actor: &UserClaims,
        payload: CreateBookRequest,
    ) -> AppResult<Book> {
        actor.require_admin()?;

        if payload.total_copies < 0 {
            return Err(AppError::Validation(
                "Total copies must be zero or greater".to_string(),
            ));
        }

        if self
            .repository
            .books
            .find_by_isbn(&payload.isbn)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists".to_string(),
            ));
        }

        let created = self
            .repository
            .books
            .create(
                &payload.title,
                &payload.author,
                &payload.genre,
                &payload.isbn,
                payload.total_copies,
                payload.total_copies,
                payload.description.as_deref(),
            )
            .await?;

        self.log_activity(
            actor,
            created.id,
            ActivityAction::CreateBook,
            &format!("Book {} created by {}", created.title, actor.email),
        )
        .await;

        Ok(created)
    }

    /// Update a book. Admin only. Copies currently on loan are computed
    /// from the persisted row, never from the patch; a new total below
    /// that count is rejected, and the available count is re-derived as
    /// `new_total - borrowed`.
    pub async fn update_book(
        &self,
        actor: &UserClaims,
        book_id: Uuid,
        patch: UpdateBookRequest,
    ) -> AppResult<Book> {
        actor.require_admin()?;

        let existing = self.repository.books.get_by_id(book_id).await?;

        if let Some(ref isbn) = patch.isbn {
            if *isbn != existing.isbn
                && self.repository.books.find_by_isbn(isbn).await?.is_some()
            {
                return Err(AppError::Conflict(
                    "Another book with this ISBN already exists".to_string(),
                ));
            }
        }

        let borrowed = existing.borrowed_copies();
        let desired_total = patch.total_copies.unwrap_or(existing.total_copies);

        if desired_total < borrowed {
            return Err(AppError::Validation(
                "Total copies cannot be less than copies currently on loan".to_string(),
            ));
        }

        let merged = Book {
            id: existing.id,
            title: patch.title.unwrap_or(existing.title),
            author: patch.author.unwrap_or(existing.author),
            genre: patch.genre.unwrap_or(existing.genre),
            isbn: patch.isbn.unwrap_or(existing.isbn),
            total_copies: desired_total,
            available_copies: desired_total - borrowed,
            description: patch.description.or(existing.description),
            created_at: existing.created_at,
        };

        let updated = self.repository.books.update(book_id, &merged).await?;

        self.log_activity(
            actor,
            updated.id,
            ActivityAction::UpdateBook,
            &format!("Book {} updated by {}", updated.title, actor.email),
        )
        .await;

        Ok(updated)
    }

    /// Delete a book. Admin only; refused while any copy is on loan.
    pub async fn delete_book(&self, actor: &UserClaims, book_id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        let existing = self.repository.books.get_by_id(book_id).await?;

        if existing.available_copies != existing.total_copies {
            return Err(AppError::Validation(
                "Cannot delete a book that is currently borrowed".to_string(),
            ));
        }

        self.repository.books.delete(book_id).await?;

        self.log_activity(
            actor,
            book_id,
            ActivityAction::DeleteBook,
            &format!("Book {} deleted by {}", existing.title, actor.email),
        )
        .await;

        Ok(())
    }

    /// Full catalog, newest first
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }

    /// Search the catalog; open to anonymous browsing
    pub async fn search_books(&self, query: &BookSearchQuery) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .search(query.term.as_deref(), query.genre.as_deref())
            .await
    }

    /// Get one book by ID
    pub async fn get_book(&self, book_id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    async fn log_activity(
        &self,
        actor: &UserClaims,
        book_id: Uuid,
        action: ActivityAction,
        message: &str,
    ) {
        if let Err(e) = self
            .repository
            .activity_logs
            .append(Some(actor.sub), Some(book_id), action, message)
            .await
        {
            tracing::warn!("Failed to append {} audit entry: {}", action, e);
        }
    }
}
