//! Seed the database with a default administrator and a starter catalog.
//!
//! Idempotent: rows that already exist are left untouched, so the binary
//! is safe to run on every deploy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use libris_server::config::AppConfig;

const ADMIN_EMAIL: &str = "admin@library.local";
const ADMIN_PASSWORD: &str = "admin-change-me";

const STARTER_BOOKS: &[(&str, &str, &str, &str, i32)] = &[
    (
        "The Left Hand of Darkness",
        "Ursula K. Le Guin",
        "Science Fiction",
        "978-0-441-47812-5",
        3,
    ),
    (
        "Pride and Prejudice",
        "Jane Austen",
        "Classic",
        "978-0-14-143951-8",
        5,
    ),
    (
        "The Name of the Rose",
        "Umberto Eco",
        "Mystery",
        "978-0-15-144647-6",
        2,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libris_server=info".into()),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    // Default administrator
    let admin_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
            .bind(ADMIN_EMAIL)
            .fetch_one(&pool)
            .await?;

    if admin_exists {
        tracing::info!("Administrator already present, skipping");
    } else {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role) VALUES ($1, $2, $3, $4, 'ADMIN')",
        )
        .bind(Uuid::new_v4())
        .bind("Administrator")
        .bind(ADMIN_EMAIL)
        .bind(&hash)
        .execute(&pool)
        .await?;

        tracing::info!("Created administrator {}", ADMIN_EMAIL);
    }

    // Starter catalog
    for (title, author, genre, isbn, copies) in STARTER_BOOKS {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&pool)
            .await?;

        if exists {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, genre, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(author)
        .bind(genre)
        .bind(isbn)
        .bind(copies)
        .execute(&pool)
        .await?;

        tracing::info!("Seeded book {}", title);
    }

    Ok(())
}
