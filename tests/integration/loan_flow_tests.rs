//! Loan workflow tests: the borrow/return state machine and its
//! interaction with the copy-count invariant

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

use crate::common::{self, BASE_URL};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_last_copy_contention_and_recovery() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (alice, _, _) = common::register_reader(&client).await;
    let (bob, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 1).await;
    let book_id = book["id"].as_str().expect("No book id");

    // Alice takes the only copy
    let response = common::borrow(&client, &alice, book_id).await;
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse");
    assert_eq!(loan["status"], "BORROWED");

    let book = common::get_book(&client, book_id).await;
    assert_eq!(book["available_copies"], 0);

    // Bob finds the shelf empty
    let response = common::borrow(&client, &bob, book_id).await;
    assert_eq!(response.status(), 400);

    // No loan was created for the failed borrow
    let bob_loans: Value = client
        .get(format!("{}/api/loans/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", bob))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse");
    assert!(bob_loans.as_array().expect("array").is_empty());

    // Alice returns; the copy goes back on the shelf
    let loan_id = loan["id"].as_str().expect("No loan id");
    let response = common::return_loan(&client, &alice, loan_id).await;
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.expect("Failed to parse");
    assert_eq!(returned["status"], "RETURNED");
    assert!(returned["returned_at"].is_string());

    let book = common::get_book(&client, book_id).await;
    assert_eq!(book["available_copies"], 1);

    // Now Bob can borrow
    let response = common::borrow(&client, &bob, book_id).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_double_borrow_of_same_book_conflicts() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 3).await;
    let book_id = book["id"].as_str().expect("No book id");

    let response = common::borrow(&client, &reader, book_id).await;
    assert_eq!(response.status(), 201);

    let response = common::borrow(&client, &reader, book_id).await;
    assert_eq!(response.status(), 409);

    // Exactly one decrement happened
    let book = common::get_book(&client, book_id).await;
    assert_eq!(book["available_copies"], 2);
}

#[tokio::test]
#[ignore]
async fn test_double_return_fails_without_double_increment() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 2).await;
    let book_id = book["id"].as_str().expect("No book id");

    let loan: Value = common::borrow(&client, &reader, book_id)
        .await
        .json()
        .await
        .expect("Failed to parse");
    let loan_id = loan["id"].as_str().expect("No loan id");

    let response = common::return_loan(&client, &reader, loan_id).await;
    assert_eq!(response.status(), 200);

    let response = common::return_loan(&client, &reader, loan_id).await;
    assert_eq!(response.status(), 400);

    let book = common::get_book(&client, book_id).await;
    assert_eq!(book["available_copies"], 2);
}

#[tokio::test]
#[ignore]
async fn test_only_borrower_or_admin_returns() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (alice, _, _) = common::register_reader(&client).await;
    let (bob, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 2).await;
    let book_id = book["id"].as_str().expect("No book id");

    let loan: Value = common::borrow(&client, &alice, book_id)
        .await
        .json()
        .await
        .expect("Failed to parse");
    let loan_id = loan["id"].as_str().expect("No loan id");

    // A stranger cannot close someone else's loan
    let response = common::return_loan(&client, &bob, loan_id).await;
    assert_eq!(response.status(), 403);

    // An administrator can
    let response = common::return_loan(&client, &admin, loan_id).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_borrow_rejects_past_due_date() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 1).await;
    let yesterday = Utc::now() - Duration::days(1);

    let response = client
        .post(format!("{}/api/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .json(&json!({
            "book_id": book["id"],
            "due_at": yesterday.to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_default_due_date_is_two_weeks_out() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 1).await;
    let book_id = book["id"].as_str().expect("No book id");

    let before = Utc::now() + Duration::days(14) - Duration::minutes(5);
    let loan: Value = common::borrow(&client, &reader, book_id)
        .await
        .json()
        .await
        .expect("Failed to parse");
    let after = Utc::now() + Duration::days(14) + Duration::minutes(5);

    let due_at: chrono::DateTime<Utc> = loan["due_at"]
        .as_str()
        .expect("No due date")
        .parse()
        .expect("Unparseable due date");

    assert!(due_at > before && due_at < after);
}

#[tokio::test]
#[ignore]
async fn test_delete_refused_while_copies_are_out() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let book = common::create_book(&client, &admin, 2).await;
    let book_id = book["id"].as_str().expect("No book id");

    let loan: Value = common::borrow(&client, &reader, book_id)
        .await
        .json()
        .await
        .expect("Failed to parse");

    let response = client
        .delete(format!("{}/api/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // After the copy comes back, deletion goes through
    let loan_id = loan["id"].as_str().expect("No loan id");
    common::return_loan(&client, &reader, loan_id).await;

    let response = client
        .delete(format!("{}/api/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_total_copies_cannot_drop_below_outstanding_loans() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;

    let book = common::create_book(&client, &admin, 5).await;
    let book_id = book["id"].as_str().expect("No book id");

    // Three copies go out
    for _ in 0..3 {
        let (reader, _, _) = common::register_reader(&client).await;
        let response = common::borrow(&client, &reader, book_id).await;
        assert_eq!(response.status(), 201);
    }

    // 2 < 3 outstanding: rejected
    let response = client
        .put(format!("{}/api/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "total_copies": 2 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // 4 >= 3 outstanding: accepted, available re-derived as 4 - 3
    let response = client
        .put(format!("{}/api/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "total_copies": 4 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse");
    assert_eq!(updated["total_copies"], 4);
    assert_eq!(updated["available_copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_newest_first() {
    let client = Client::new();
    let admin = common::admin_token(&client).await;
    let (reader, _, _) = common::register_reader(&client).await;

    let first = common::create_book(&client, &admin, 1).await;
    let second = common::create_book(&client, &admin, 1).await;

    common::borrow(&client, &reader, first["id"].as_str().unwrap()).await;
    common::borrow(&client, &reader, second["id"].as_str().unwrap()).await;

    let loans: Value = client
        .get(format!("{}/api/loans/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse");

    let loans = loans.as_array().expect("array");
    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0]["book_id"], second["id"]);
    assert_eq!(loans[1]["book_id"], first["id"]);
    assert!(loans[0]["book_title"].is_string());
    assert!(loans[0]["user_email"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_all_loans_requires_admin() {
    let client = Client::new();
    let (reader, _, _) = common::register_reader(&client).await;

    let response = client
        .get(format!("{}/api/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
