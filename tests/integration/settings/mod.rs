//! System settings integration tests
//!
//! Tax settings are admin-only whatever enterprises a user owns.

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_enterprise_owner_cannot_reach_tax_settings() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    app.create_enterprise(owner.id, "Green Grocer").await.unwrap();

    let response = client.get("/admin/tax_settings").await.unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Unauthorized");

    let response = client
        .put(
            "/admin/tax_settings",
            json!({ "products_require_tax_category": true }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_updates_tax_settings() {
    let app = TestApp::new().await.unwrap();
    let (_, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let defaults = client.get("/admin/tax_settings").await.unwrap().json();
    assert_eq!(defaults["products_require_tax_category"], false);

    let response = client
        .put(
            "/admin/tax_settings",
            json!({
                "products_require_tax_category": true,
                "shipping_tax_rate": "0.2",
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let reloaded = client.get("/admin/tax_settings").await.unwrap().json();
    assert_eq!(reloaded["products_require_tax_category"], true);
    assert_eq!(
        reloaded["display_tax_breakdown_on_invoices"],
        defaults["display_tax_breakdown_on_invoices"]
    );
}

#[tokio::test]
async fn test_public_terms_of_service() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let mut anonymous = app.client();

    let response = anonymous.get("/terms_of_service").await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    admin
        .post(
            "/admin/terms_of_service_files",
            json!({ "filename": "terms.pdf" }),
        )
        .await
        .unwrap();

    let response = anonymous.get("/terms_of_service").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["filename"], "terms.pdf");
}
