//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book by ISBN
    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Create a new book
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: &str,
        author: &str,
        genre: &str,
        isbn: &str,
        total_copies: i32,
        available_copies: i32,
        description: Option<&str>,
    ) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, genre, isbn, total_copies, available_copies, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(author)
        .bind(genre)
        .bind(isbn)
        .bind(total_copies)
        .bind(available_copies)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Update a book with fully merged values (the service computes the
    /// merge so copy-count arithmetic happens in one place)
    pub async fn update(&self, id: Uuid, merged: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2,
                author = $3,
                genre = $4,
                isbn = $5,
                total_copies = $6,
                available_copies = $7,
                description = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&merged.title)
        .bind(&merged.author)
        .bind(&merged.genre)
        .bind(&merged.isbn)
        .bind(merged.total_copies)
        .bind(merged.available_copies)
        .bind(&merged.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all books, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Search books by free term (title/author/ISBN) and genre, both
    /// case-insensitive substring matches; no filters yields the full
    /// catalog ordered by title
    pub async fn search(&self, term: Option<&str>, genre: Option<&str>) -> AppResult<Vec<Book>> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(term) = term {
            params.push(format!("%{}%", term));
            conditions.push(format!(
                "(title ILIKE ${n} OR author ILIKE ${n} OR isbn ILIKE ${n})",
                n = params.len()
            ));
        }

        if let Some(genre) = genre {
            params.push(format!("%{}%", genre));
            conditions.push(format!("genre ILIKE ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT * FROM books {} ORDER BY title ASC", where_clause);

        let mut builder = sqlx::query_as::<_, Book>(&query);
        for param in &params {
            builder = builder.bind(param);
        }
        let books = builder.fetch_all(&self.pool).await?;

        Ok(books)
    }

    /// Atomically take one available copy. The guard and the write are a
    /// single conditional UPDATE; `None` means no copy was available at
    /// the moment of the write.
    pub async fn decrement_available(&self, book_id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            RETURNING *
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Transaction-scoped variant of [`decrement_available`], so the loan
    /// insert and the copy-count adjustment commit or roll back together
    pub async fn decrement_available_in_tx(
        &self,
        conn: &mut PgConnection,
        book_id: Uuid,
    ) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            RETURNING *
            "#,
        )
        .bind(book_id)
        .fetch_optional(conn)
        .await?;

        Ok(book)
    }

    /// Atomically put one copy back, bounded by `total_copies`. `None`
    /// means the shelf was already full.
    pub async fn increment_available(&self, book_id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET available_copies = available_copies + 1
            WHERE id = $1 AND available_copies < total_copies
            RETURNING *
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }
}
