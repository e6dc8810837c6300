//! General API tests: health, authentication, catalog administration,
//! audit trail access

use reqwest::Client;
use serde_json::{json, Value};

use crate::common::{self, BASE_URL};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let (_, user, email) = common::register_reader(&client).await;

    assert_eq!(user["role"], "USER");
    assert!(user.get("password_hash").is_none(), "digest must never be serialized");

    let response = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "reading-is-fun" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let (_, _, email) = common::register_reader(&client).await;

    let response = client
        .post(format!("{}/api/auth/register", BASE_URL))
        .json(&json!({
            "name": "Copycat",
            "email": email,
            "password": "another-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Same address, different case: still a conflict
    let response = client
        .post(format!("{}/api/auth/register", BASE_URL))
        .json(&json!({
            "name": "Copycat",
            "email": email.to_uppercase(),
            "password": "another-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_login_failures_are_indistinguishable() {
    let client = Client::new();
    let (_, _, email) = common::register_reader(&client).await;

    let wrong_password = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send request");

    let unknown_user = client
        .post(format!("{}/api/auth/login", BASE_URL))
        .json(&json!({ "email": "nobody@example.org", "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    let a: Value = wrong_password.json().await.expect("Failed to parse");
    let b: Value = unknown_user.json().await.expect("Failed to parse");
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
#[ignore]
async fn test_catalog_browsing_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_catalog_mutation_requires_admin() {
    let client = Client::new();
    let (reader_token, _, _) = common::register_reader(&client).await;

    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader_token))
        .json(&json!({
            "title": "Forbidden Book",
            "author": "Nobody",
            "genre": "None",
            "isbn": "no-isbn",
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    // Anonymous writes are rejected outright
    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .json(&json!({
            "title": "Forbidden Book",
            "author": "Nobody",
            "genre": "None",
            "isbn": "no-isbn",
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflicts() {
    let client = Client::new();
    let token = common::admin_token(&client).await;
    let book = common::create_book(&client, &token, 1).await;

    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Same ISBN",
            "author": "Someone Else",
            "genre": "Testing",
            "isbn": book["isbn"],
            "total_copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_negative_copies() {
    let client = Client::new();
    let token = common::admin_token(&client).await;

    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Negative Space",
            "author": "Nobody",
            "genre": "Testing",
            "isbn": "neg-copies",
            "total_copies": -1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_search_is_idempotent() {
    let client = Client::new();
    let token = common::admin_token(&client).await;
    let book = common::create_book(&client, &token, 1).await;
    let isbn = book["isbn"].as_str().expect("No isbn");

    let first: Value = client
        .get(format!("{}/api/books/search?term={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse");

    let second: Value = client
        .get(format!("{}/api/books/search?term={}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse");

    assert_eq!(first.as_array().expect("array").len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore]
async fn test_logs_are_admin_only() {
    let client = Client::new();
    let (reader_token, _, _) = common::register_reader(&client).await;

    let response = client
        .get(format!("{}/api/logs", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let token = common::admin_token(&client).await;
    let response = client
        .get(format!("{}/api/logs", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body.as_array().expect("Expected an array");
    assert!(entries.len() <= 200);
}

#[tokio::test]
#[ignore]
async fn test_admin_creates_member_with_role() {
    let client = Client::new();
    let token = common::admin_token(&client).await;

    let email = format!("member-{}@example.org", uuid::Uuid::new_v4());
    let response = client
        .post(format!("{}/api/auth/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "New Librarian",
            "email": email,
            "password": "strong-password",
            "role": "ADMIN"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "ADMIN");
}
