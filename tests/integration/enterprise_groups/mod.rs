//! Enterprise group integration tests
//!
//! Admins create, edit, reorder and delete groups; group owners may edit
//! their own groups; everyone else is refused.

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::{json, Value};

use crate::common::TestApp;

fn names(groups: &Value) -> Vec<String> {
    groups
        .as_array()
        .map(|groups| {
            groups
                .iter()
                .filter_map(|g| g["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_group_crud_keeps_member_order() {
    let app = TestApp::new().await.unwrap();
    let (admin, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let farm = app.create_enterprise(admin.id, "Green Farm").await.unwrap();
    let hub = app.create_enterprise(admin.id, "City Hub").await.unwrap();

    let response = client
        .post(
            "/admin/enterprise_groups",
            json!({
                "name": "  Northern Producers ",
                "description": "Farms north of the river",
                "on_front_page": true,
                "enterprise_ids": [hub.id, farm.id, hub.id],
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    let group = response.json();
    assert_eq!(group["name"], "Northern Producers");
    assert_eq!(group["owner_id"], admin.id.to_string());
    let members: Vec<_> = group["enterprises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(members, vec!["City Hub", "Green Farm"]);

    let id = group["id"].as_str().unwrap();
    let response = client
        .patch(
            &format!("/admin/enterprise_groups/{}", id),
            json!({ "name": "Northern Farms", "enterprise_ids": [farm.id] }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let updated = response.json();
    assert_eq!(updated["name"], "Northern Farms");
    assert_eq!(updated["enterprises"].as_array().unwrap().len(), 1);

    let response = client
        .delete(&format!("/admin/enterprise_groups/{}", id))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = client
        .get(&format!("/admin/enterprise_groups/{}", id))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_and_blank_names() {
    let app = TestApp::new().await.unwrap();
    let (_, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let response = client
        .post("/admin/enterprise_groups", json!({ "name": "Growers" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);

    let response = client
        .post("/admin/enterprise_groups", json!({ "name": "Growers" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_message(), "Name has already been taken");

    let response = client
        .post("/admin/enterprise_groups", json!({ "name": "   " }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Name can't be blank");
}

#[tokio::test]
async fn test_groups_reorder() {
    let app = TestApp::new().await.unwrap();
    let (_, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();

    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let group = client
            .post("/admin/enterprise_groups", json!({ "name": name }))
            .await
            .unwrap()
            .json();
        ids.push(group["id"].as_str().unwrap().to_string());
    }

    let response = client
        .post(&format!("/admin/enterprise_groups/{}/move_up", ids[2]), json!({}))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.json()), vec!["First", "Third", "Second"]);

    // moving the first group up changes nothing
    let response = client
        .post(&format!("/admin/enterprise_groups/{}/move_up", ids[0]), json!({}))
        .await
        .unwrap();
    assert_eq!(names(&response.json()), vec!["First", "Third", "Second"]);

    let response = client
        .post(&format!("/admin/enterprise_groups/{}/move_down", ids[0]), json!({}))
        .await
        .unwrap();
    assert_eq!(names(&response.json()), vec!["Third", "First", "Second"]);
}

#[tokio::test]
async fn test_non_admin_cannot_create_groups() {
    let app = TestApp::new().await.unwrap();
    let (user, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    app.create_enterprise(user.id, "Own Farm").await.unwrap();

    let response = client
        .post("/admin/enterprise_groups", json!({ "name": "Mine" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "Unauthorized");
}

#[tokio::test]
async fn test_group_owner_can_edit_but_not_reassign() {
    let app = TestApp::new().await.unwrap();
    let (_, mut admin) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let (owner, mut client) = app
        .login_as("owner@example.com", UserRole::User)
        .await
        .unwrap();
    let other = app
        .create_user("other@example.com", UserRole::User)
        .await
        .unwrap();

    let group = admin
        .post(
            "/admin/enterprise_groups",
            json!({ "name": "Owned", "owner_id": owner.id }),
        )
        .await
        .unwrap()
        .json();
    let path = format!("/admin/enterprise_groups/{}", group["id"].as_str().unwrap());

    let response = client
        .patch(&path, json!({ "description": "Ours" }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["description"], "Ours");

    let response = client
        .patch(&path, json!({ "owner_id": other.id }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let listed = client.get("/admin/enterprise_groups").await.unwrap().json();
    assert_eq!(names(&listed), vec!["Owned"]);
}
