//! Shared helpers for integration tests

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

pub const BASE_URL: &str = "http://localhost:8080";

/// Credentials created by the seed binary
pub const ADMIN_EMAIL: &str = "admin@library.local";
pub const ADMIN_PASSWORD: &str = "admin-change-me";

/// Log in as the seeded administrator
pub async fn admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Register a fresh reader account; returns (token, user, email)
pub async fn register_reader(client: &Client) -> (String, Value, String) {
    let email = format!("reader-{}@example.org", Uuid::new_v4());
    let response = client
        .post(format!("{}/api/auth/register", BASE_URL))
        .json(&json!({
            "name": "Integration Reader",
            "email": email,
            "password": "reading-is-fun"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("No token").to_string();
    (token, body["user"].clone(), email)
}

/// Create a book with a unique ISBN; returns the created book
pub async fn create_book(client: &Client, token: &str, total_copies: i32) -> Value {
    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Integration Test Book",
            "author": "Test Author",
            "genre": "Testing",
            "isbn": format!("it-{}", Uuid::new_v4()),
            "total_copies": total_copies
        }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

/// Fetch a book by id
pub async fn get_book(client: &Client, book_id: &str) -> Value {
    let response = client
        .get(format!("{}/api/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

/// Borrow a book; returns the raw response
pub async fn borrow(client: &Client, token: &str, book_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send borrow request")
}

/// Return a loan; returns the raw response
pub async fn return_loan(client: &Client, token: &str, loan_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/loans/{}/return", BASE_URL, loan_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request")
}
