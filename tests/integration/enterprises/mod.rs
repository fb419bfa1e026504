//! Enterprise integration tests
//!
//! - Owners cannot exceed their enterprise limit
//! - Managers may edit but not delete, and cannot grant management
//! - Listings are scoped to owned and managed enterprises

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::{json, Value};

use crate::common::TestApp;

fn names(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_enterprise_limit_and_unique_names() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();

    let response = admin
        .patch(
            &format!("/admin/users/{}", owner.id),
            json!({ "enterprise_limit": 1 }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);

    let response = client
        .post("/admin/enterprises", json!({ "name": "Hillside Farm" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["owner_id"], owner.id.to_string());

    let response = client
        .post("/admin/enterprises", json!({ "name": "Valley Farm" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.error_message(),
        "You are not permitted to own more than 1 enterprises"
    );

    let response = admin
        .post("/admin/enterprises", json!({ "name": "Hillside Farm" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_message(), "Name has already been taken");

    // only admins may create on behalf of someone else
    let response = client
        .post(
            "/admin/enterprises",
            json!({ "name": "Borrowed Farm", "owner_id": uuid::Uuid::new_v4() }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Unauthorized");
}

#[tokio::test]
async fn test_manager_edits_but_cannot_delete_or_grant() {
    let app = TestApp::new().await.unwrap();
    let (owner, mut owner_client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let (_, mut manager) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let (_, mut outsider) = app
        .login_as("outsider@example.com", UserRole::User)
        .await
        .unwrap();
    let farm = app.create_enterprise(owner.id, "Hillside Farm").await.unwrap();
    let path = format!("/admin/enterprises/{}", farm.id);
    let managers = format!("{}/managers", path);

    let response = owner_client
        .post(&managers, json!({ "email": "manager@example.com" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json().as_array().unwrap().len(), 1);

    let response = manager
        .patch(&path, json!({ "name": "Hillside Organics" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["name"], "Hillside Organics");

    let response = manager.delete(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Unauthorized");

    let response = manager
        .post(&managers, json!({ "email": "outsider@example.com" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Unauthorized");

    let response = outsider.get(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = outsider
        .patch(&path, json!({ "name": "Taken Over" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = owner_client.delete(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = owner_client.get(&path).await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_is_scoped_to_owned_and_managed() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let (first_owner, mut first) = app
        .login_as("first@example.com", UserRole::User)
        .await
        .unwrap();
    let (second_owner, mut second) = app
        .login_as("second@example.com", UserRole::User)
        .await
        .unwrap();
    let (_, mut manager) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();

    app.create_enterprise(first_owner.id, "Apple Orchard")
        .await
        .unwrap();
    let dairy = app
        .create_enterprise(second_owner.id, "Brook Dairy")
        .await
        .unwrap();
    second
        .post(
            &format!("/admin/enterprises/{}/managers", dairy.id),
            json!({ "email": "manager@example.com" }),
        )
        .await
        .unwrap();

    let all = admin.get("/admin/enterprises").await.unwrap().json();
    assert_eq!(names(&all), vec!["Apple Orchard", "Brook Dairy"]);

    let owned = first.get("/admin/enterprises").await.unwrap().json();
    assert_eq!(names(&owned), vec!["Apple Orchard"]);

    let managed = manager.get("/admin/enterprises").await.unwrap().json();
    assert_eq!(names(&managed), vec!["Brook Dairy"]);
}
