//! Repository layer for database operations

pub mod activity_logs;
pub mod books;
pub mod loans;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding the database connection pool.
///
/// Constructed once at process start and shared by reference through the
/// service layer; canonical entity state lives here and nowhere else.
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub activity_logs: activity_logs::ActivityLogsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            activity_logs: activity_logs::ActivityLogsRepository::new(pool.clone()),
            pool,
        }
    }
}
