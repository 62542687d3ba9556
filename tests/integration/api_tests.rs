//! API integration tests
//!
//! Require a running server with an empty database:
//! `cargo test --test api_tests -- --ignored --test-threads=1`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create a tape and return its public ID
async fn create_tape(client: &Client, title: &str, quantity: i32) -> String {
    let response = client
        .post(format!("{}/tapes", BASE_URL))
        .json(&json!({
            "title": title,
            "director": "John Carpenter",
            "genre": "Horror",
            "quantity": quantity,
            "price": "2.50"
        }))
        .send()
        .await
        .expect("Failed to send create tape request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse tape");
    body["public_id"].as_str().expect("No public_id in tape").to_string()
}

/// Create a user and return its public ID
async fn create_user(client: &Client, username: &str) -> String {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "rewind1234"
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["public_id"].as_str().expect("No public_id in user").to_string()
}

async fn rent(client: &Client, tape_id: &str, user_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/rentals/{}", BASE_URL, tape_id))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send rental request")
}

async fn reset(client: &Client) {
    for path in ["rentals", "tapes", "users"] {
        let response = client
            .delete(format!("{}/{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send delete request");
        assert_eq!(response.status(), 204);
    }
}

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
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_create_tape_rejects_non_positive_price() {
    let client = Client::new();

    let response = client
        .post(format!("{}/tapes", BASE_URL))
        .json(&json!({
            "title": "Free Tape",
            "director": "Nobody",
            "genre": "Drama",
            "quantity": 1,
            "price": "0"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_single_copy_rent_flow() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "The Thing", 1).await;
    let first = create_user(&client, "macready").await;
    let second = create_user(&client, "childs").await;

    let response = rent(&client, &tape_id, &first).await;
    assert_eq!(response.status(), 201);
    let rental: Value = response.json().await.expect("Failed to parse rental");
    assert_eq!(rental["tape_public_id"], tape_id.as_str());
    assert_eq!(rental["user_public_id"], first.as_str());
    assert!(rental["returned_at"].is_null());

    let response = rent(&client, &tape_id, &second).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "TapeUnavailable");

    let response = client
        .post(format!("{}/rentals/return", BASE_URL))
        .json(&json!({ "tape_id": tape_id, "user_id": first }))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.expect("Failed to parse rental");
    assert!(returned["returned_at"].is_string());

    let response = rent(&client, &tape_id, &second).await;
    assert_eq!(response.status(), 201);

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_user_rental_limit() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "Halloween", 5).await;
    let user_id = create_user(&client, "loomis").await;

    assert_eq!(rent(&client, &tape_id, &user_id).await.status(), 201);
    assert_eq!(rent(&client, &tape_id, &user_id).await.status(), 201);

    let response = rent(&client, &tape_id, &user_id).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "MaxRentalsReached");

    let response = client
        .get(format!("{}/rentals", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let rentals: Value = response.json().await.expect("Failed to parse rentals");
    assert_eq!(rentals.as_array().map(Vec::len), Some(2));

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_rent_with_invalid_identifier() {
    let client = Client::new();

    let response = rent(&client, "not-a-uuid", "also-not-a-uuid").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "InvalidIdentifier");
}

#[tokio::test]
#[ignore]
async fn test_rent_unknown_tape() {
    let client = Client::new();

    let response = rent(
        &client,
        "00000000-0000-0000-0000-000000000000",
        "00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "NoSuchTape");
}

#[tokio::test]
#[ignore]
async fn test_return_without_active_rental() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "Escape from New York", 1).await;
    let user_id = create_user(&client, "plissken").await;

    let response = client
        .post(format!("{}/rentals/return", BASE_URL))
        .json(&json!({ "tape_id": tape_id, "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 404);

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_concurrent_rentals_of_single_copy() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "They Live", 1).await;
    let mut user_ids = Vec::new();
    for i in 0..10 {
        user_ids.push(create_user(&client, &format!("nada{}", i)).await);
    }

    let handles: Vec<_> = user_ids
        .into_iter()
        .map(|user_id| {
            let client = client.clone();
            let tape_id = tape_id.clone();
            tokio::spawn(async move { rent(&client, &tape_id, &user_id).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        let response = handle.await.expect("Rental task panicked");
        if response.status() == 201 {
            admitted += 1;
        } else {
            assert_eq!(response.status(), 409);
            let body: Value = response.json().await.expect("Failed to parse error");
            assert_eq!(body["error"], "TapeUnavailable");
        }
    }
    assert_eq!(admitted, 1);

    let response = client
        .get(format!("{}/rentals", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let rentals: Value = response.json().await.expect("Failed to parse rentals");
    assert_eq!(rentals.as_array().map(Vec::len), Some(1));

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_concurrent_rentals_by_one_user() {
    let client = Client::new();
    reset(&client).await;

    let user_id = create_user(&client, "snake").await;
    let mut tape_ids = Vec::new();
    for i in 0..6 {
        tape_ids.push(create_tape(&client, &format!("Assault on Precinct {}", i), 3).await);
    }

    let handles: Vec<_> = tape_ids
        .into_iter()
        .map(|tape_id| {
            let client = client.clone();
            let user_id = user_id.clone();
            tokio::spawn(async move { rent(&client, &tape_id, &user_id).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        let response = handle.await.expect("Rental task panicked");
        if response.status() == 201 {
            admitted += 1;
        } else {
            assert_eq!(response.status(), 409);
            let body: Value = response.json().await.expect("Failed to parse error");
            assert_eq!(body["error"], "MaxRentalsReached");
        }
    }
    assert_eq!(admitted, 2);

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_quantity_cannot_drop_below_rented_copies() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "Starman", 1).await;
    let user_id = create_user(&client, "jenny").await;
    assert_eq!(rent(&client, &tape_id, &user_id).await.status(), 201);

    let response = client
        .patch(format!("{}/tapes/{}", BASE_URL, tape_id))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "Duplicate");

    let response = client
        .get(format!("{}/tapes/{}", BASE_URL, tape_id))
        .send()
        .await
        .expect("Failed to send request");
    let tape: Value = response.json().await.expect("Failed to parse tape");
    assert_eq!(tape["quantity"], 1);

    reset(&client).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_tape_with_rental_history() {
    let client = Client::new();
    reset(&client).await;

    let tape_id = create_tape(&client, "Christine", 2).await;
    let user_id = create_user(&client, "arnie").await;
    assert_eq!(rent(&client, &tape_id, &user_id).await.status(), 201);

    let response = client
        .delete(format!("{}/tapes/{}", BASE_URL, tape_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/users", BASE_URL))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 409);

    reset(&client).await;
}
