//! Session gate integration tests
//!
//! - Unauthenticated `/admin` requests redirect to the login form
//! - A valid login lands back on the originally requested path
//! - Logout kills the session immediately

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::json;

use crate::common::{TestApp, PASSWORD};

#[tokio::test]
async fn test_unauthenticated_request_redirects_to_login() {
    let app = TestApp::new().await.unwrap();
    let mut client = app.client();

    let response = client.get("/admin/orders?state=complete").await.unwrap();

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some("/login?return_to=%2Fadmin%2Forders%3Fstate%3Dcomplete")
    );
}

#[tokio::test]
async fn test_login_returns_to_original_path() {
    let app = TestApp::new().await.unwrap();
    app.create_user("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let mut client = app.client();

    let response = client
        .post_form(
            "/login?return_to=%2Fadmin%2Fenterprise_groups",
            &format!("email=admin%40example.com&password={}", PASSWORD),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/enterprise_groups"));
    assert!(client.has_session());

    let response = client.get("/admin/enterprise_groups").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_refuses_offsite_return_to() {
    let app = TestApp::new().await.unwrap();
    app.create_user("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let mut client = app.client();

    let response = client
        .post(
            "/login",
            json!({
                "email": "admin@example.com",
                "password": PASSWORD,
                "return_to": "//evil.example.com/admin",
            }),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new().await.unwrap();
    app.create_user("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let mut client = app.client();

    let response = client
        .post(
            "/login",
            json!({ "email": "admin@example.com", "password": "not-the-password" }),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_message(), "Invalid email or password");
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new().await.unwrap();
    let (_, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let stale = client.clone();

    let response = client.post("/logout", json!({})).await.unwrap();
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
    assert!(!client.has_session());

    // the old cookie is dead too
    let mut stale = stale;
    let response = stale.get("/admin").await.unwrap();
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_dashboard_shows_terms_banner_until_accepted() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let response = admin.get("/admin").await.unwrap();
    assert_eq!(response.json()["terms_of_service_banner"], false);

    let response = admin
        .post(
            "/admin/terms_of_service_files",
            json!({ "filename": "terms-2025.pdf" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);

    let response = admin.get("/admin").await.unwrap();
    assert_eq!(response.json()["terms_of_service_banner"], true);

    let response = admin
        .post("/admin/account/terms_of_service/accept", json!({}))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let response = admin.get("/admin").await.unwrap();
    assert_eq!(response.json()["terms_of_service_banner"], false);
}
