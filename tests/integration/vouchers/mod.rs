//! Voucher integration tests
//!
//! A created voucher is retrievable by (enterprise, code) straight away;
//! a blank code persists nothing.

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use foodhub_vouchers::VoucherRepository;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_flat_voucher_is_retrievable_after_creation() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let shop = app.create_enterprise(owner.id, "Green Grocer").await.unwrap();

    let response = client
        .post(
            &format!("/admin/enterprises/{}/vouchers", shop.id),
            json!({ "code": "WELCOME5", "voucher_type": "flat", "amount": "5.00" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["amount"], "5.00");

    let stored = VoucherRepository::new(app.pool.clone())
        .find_by_code(shop.id, "WELCOME5")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.amount_cents, 500);

    let response = client
        .get(&format!("/admin/enterprises/{}/vouchers/WELCOME5", shop.id))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["voucher_type"], "flat");
}

#[tokio::test]
async fn test_blank_code_creates_nothing() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let shop = app.create_enterprise(owner.id, "Green Grocer").await.unwrap();
    let path = format!("/admin/enterprises/{}/vouchers", shop.id);

    let response = client
        .post(&path, json!({ "code": "  ", "amount": "5.00" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("Code can't be blank"));

    let listed = client.get(&path).await.unwrap().json();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_code_and_percentage_limit() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let shop = app.create_enterprise(owner.id, "Green Grocer").await.unwrap();
    let path = format!("/admin/enterprises/{}/vouchers", shop.id);

    client
        .post(&path, json!({ "code": "SAVE", "amount": "1.00" }))
        .await
        .unwrap();
    let response = client
        .post(&path, json!({ "code": "SAVE", "amount": "2.00" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Code has already been taken");

    let response = client
        .post(
            &path,
            json!({ "code": "HALF", "voucher_type": "percentage", "amount": "150" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        "Amount must be less than or equal to 100"
    );
}

#[tokio::test]
async fn test_vouchers_belong_to_their_enterprise() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let (_, mut stranger) = app
        .login_as("stranger@example.com", UserRole::User)
        .await
        .unwrap();
    let shop = app.create_enterprise(owner.id, "Green Grocer").await.unwrap();
    let path = format!("/admin/enterprises/{}/vouchers", shop.id);

    client
        .post(&path, json!({ "code": "MINE", "amount": "1.00" }))
        .await
        .unwrap();

    let response = stranger.get(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = client.delete(&format!("{}/MINE", path)).await.unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = client.get(&format!("{}/MINE", path)).await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
