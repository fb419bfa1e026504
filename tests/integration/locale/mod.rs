//! Locale resolution integration tests
//!
//! The `?locale=` parameter switches the effective locale for one request
//! and never persists; `PUT /admin/account/locale` persists valid locales.

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::json;

use crate::common::TestApp;

const LOCALES: &[(&str, &str)] = &[("AVAILABLE_LOCALES", "en,fr,pt_BR"), ("DEFAULT_LOCALE", "en")];

#[tokio::test]
async fn test_unsupported_locale_falls_back_to_default() {
    let app = TestApp::with_env(LOCALES).await.unwrap();
    let (_, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();

    let response = client.get("/admin?locale=xx").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["locale"], "en");
    assert_eq!(response.header("content-language"), Some("en"));

    let response = client
        .put("/admin/account/locale", json!({ "locale": "xx" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Locale 'xx' is not available");

    let account = client.get("/admin/account").await.unwrap().json();
    assert!(account["locale"].is_null());
    assert_eq!(client.get("/admin").await.unwrap().json()["locale"], "en");
}

#[tokio::test]
async fn test_query_locale_is_not_persisted() {
    let app = TestApp::with_env(LOCALES).await.unwrap();
    let (_, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();

    let response = client.get("/admin?locale=fr").await.unwrap();
    assert_eq!(response.json()["locale"], "fr");
    assert_eq!(response.header("content-language"), Some("fr"));

    let response = client.get("/admin").await.unwrap();
    assert_eq!(response.json()["locale"], "en");
}

#[tokio::test]
async fn test_switched_locale_is_persisted() {
    let app = TestApp::with_env(LOCALES).await.unwrap();
    let (_, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();

    let response = client
        .put("/admin/account/locale", json!({ "locale": "pt_BR" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-language"), Some("pt-BR"));
    assert_eq!(response.json()["locale"], "pt_BR");

    let response = client.get("/admin").await.unwrap();
    assert_eq!(response.json()["locale"], "pt_BR");
    assert_eq!(response.header("content-language"), Some("pt-BR"));
}

#[tokio::test]
async fn test_anonymous_requests_use_default_locale() {
    let app = TestApp::with_env(LOCALES).await.unwrap();
    let mut client = app.client();

    let response = client.get("/health?locale=fr").await.unwrap();
    assert_eq!(response.header("content-language"), Some("fr"));

    let response = client.get("/health").await.unwrap();
    assert_eq!(response.header("content-language"), Some("en"));
}
