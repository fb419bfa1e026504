//! User administration integration tests

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_admin_creates_user_who_can_log_in() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let response = admin
        .post(
            "/admin/users",
            json!({ "email": "Grower@Example.com", "password": "longenough" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    let user = response.json();
    assert_eq!(user["email"], "grower@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let mut grower = app.client();
    grower.login("grower@example.com", "longenough").await.unwrap();
    assert!(grower.has_session());

    let listed = admin.get("/admin/users?per_page=1&page=2").await.unwrap().json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_creation_validation() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let short = admin
        .post(
            "/admin/users",
            json!({ "email": "new@example.com", "password": "short" }),
        )
        .await
        .unwrap();
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert!(short.error_message().contains("Password is too short"));

    let taken = admin
        .post(
            "/admin/users",
            json!({ "email": "admin@example.com", "password": "longenough" }),
        )
        .await
        .unwrap();
    assert_eq!(taken.status, StatusCode::CONFLICT);
    assert_eq!(taken.error_message(), "Email has already been taken");
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let app = TestApp::new().await.unwrap();
    let (admin_user, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let response = admin
        .patch(
            &format!("/admin/users/{}", admin_user.id),
            json!({ "role": "user" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "You cannot remove your own admin role");
}

#[tokio::test]
async fn test_non_admin_cannot_manage_users() {
    let app = TestApp::new().await.unwrap();
    let (_, mut owner) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();

    let list = owner.get("/admin/users").await.unwrap();
    assert_eq!(list.status, StatusCode::FORBIDDEN);
    assert_eq!(list.error_message(), "Unauthorized");

    let create = owner
        .post(
            "/admin/users",
            json!({ "email": "x@example.com", "password": "longenough" }),
        )
        .await
        .unwrap();
    assert_eq!(create.status, StatusCode::FORBIDDEN);
}
