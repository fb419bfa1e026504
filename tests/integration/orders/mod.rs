//! Order integration tests
//!
//! - Bulk cancel cancels exactly the selected complete orders
//! - Cancellation is idempotent and optionally emails the customer
//! - Vouchers discount cart totals
//! - Oversized line items are rejected

use axum::http::StatusCode;
use foodhub_accounts::UserRole;
use serde_json::{json, Value};

use crate::common::{create_cart, create_complete_order, TestApp, TestClient};

async fn order(client: &mut TestClient, order: &Value) -> Value {
    client
        .get(&format!("/admin/orders/{}", order["id"].as_str().unwrap()))
        .await
        .unwrap()
        .json()
}

#[tokio::test]
async fn test_bulk_cancel_cancels_exactly_selected_orders() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    let first = create_complete_order(&mut client, hub.id).await.unwrap();
    let second = create_complete_order(&mut client, hub.id).await.unwrap();
    let untouched = create_complete_order(&mut client, hub.id).await.unwrap();
    assert_eq!(first["state"], "complete");
    assert_eq!(first["shipment_state"], "ready");
    assert_eq!(first["payment_state"], "paid");

    let response = client
        .post(
            "/admin/orders/bulk_cancel",
            json!({ "order_ids": [first["id"], second["id"]] }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["canceled"], json!([first["number"], second["number"]]));
    assert_eq!(body["skipped"], json!([]));

    for canceled in [&first, &second] {
        let reloaded = order(&mut client, canceled).await;
        assert_eq!(reloaded["state"], "canceled");
        assert_eq!(reloaded["shipment_state"], "canceled");
        assert!(reloaded["canceled_at"].is_string());
        // captured money stays captured until refunded
        assert_eq!(reloaded["payment_state"], "credit_owed");
        assert_eq!(reloaded["payments"][0]["state"], "completed");
    }

    let reloaded = order(&mut client, &untouched).await;
    assert_eq!(reloaded["state"], "complete");
    assert_eq!(reloaded["shipment_state"], "ready");

    let listed = client
        .get("/admin/orders?state=canceled")
        .await
        .unwrap()
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_cancel_is_all_or_nothing() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    let complete = create_complete_order(&mut client, hub.id).await.unwrap();
    let cart = create_cart(&mut client, hub.id, 1, "3.00").await.unwrap();

    let response = client
        .post(
            "/admin/orders/bulk_cancel",
            json!({ "order_ids": [complete["id"], cart["id"]] }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        format!(
            "Order {} cannot be canceled from 'cart' state",
            cart["number"].as_str().unwrap()
        )
    );

    assert_eq!(order(&mut client, &complete).await["state"], "complete");
    assert_eq!(order(&mut client, &cart).await["state"], "cart");
}

#[tokio::test]
async fn test_bulk_cancel_skips_canceled_and_rejects_foreign_orders() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let (stranger, mut other) = app
        .login_as("stranger@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();
    let other_hub = app.create_enterprise(stranger.id, "Other Hub").await.unwrap();

    let mine = create_complete_order(&mut client, hub.id).await.unwrap();
    let theirs = create_complete_order(&mut other, other_hub.id).await.unwrap();

    let response = client
        .post(
            "/admin/orders/bulk_cancel",
            json!({ "order_ids": [mine["id"], theirs["id"]] }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(order(&mut client, &mine).await["state"], "complete");

    let response = client
        .post("/admin/orders/bulk_cancel", json!({ "order_ids": [mine["id"]] }))
        .await
        .unwrap();
    assert_eq!(response.json()["canceled"], json!([mine["number"]]));

    let response = client
        .post("/admin/orders/bulk_cancel", json!({ "order_ids": [mine["id"]] }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["canceled"], json!([]));
    assert_eq!(response.json()["skipped"], json!([mine["number"]]));

    let response = client
        .post("/admin/orders/bulk_cancel", json!({ "order_ids": [] }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "No orders selected");
}

#[tokio::test]
async fn test_cancel_is_idempotent_and_emails_once() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();
    let complete = create_complete_order(&mut client, hub.id).await.unwrap();
    let path = format!("/admin/orders/{}/cancel", complete["id"].as_str().unwrap());

    let response = client
        .post(&path, json!({ "send_cancellation_email": true }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let canceled = response.json();
    assert_eq!(canceled["state"], "canceled");
    assert_eq!(canceled["shipment_state"], "canceled");

    let response = client
        .post(&path, json!({ "send_cancellation_email": true }))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["canceled_at"], canceled["canceled_at"]);

    let emails = app.email.get_emails_for_recipient("customer@example.com");
    assert_eq!(emails.len(), 1);
    let message = &emails[0].message;
    assert!(message.subject.contains(complete["number"].as_str().unwrap()));
    assert!(message.body_text.contains("City Hub"));
    assert!(message.body_text.contains("$10.00"));
}

#[tokio::test]
async fn test_cancel_survives_email_failure() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();
    let complete = create_complete_order(&mut client, hub.id).await.unwrap();
    app.email.set_failing(true);

    let response = client
        .post(
            &format!("/admin/orders/{}/cancel", complete["id"].as_str().unwrap()),
            json!({ "send_cancellation_email": true }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["state"], "canceled");
    assert_eq!(app.email.email_count(), 0);
}

#[tokio::test]
async fn test_cart_cannot_be_canceled_and_canceled_order_resumes() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    let cart = create_cart(&mut client, hub.id, 1, "4.00").await.unwrap();
    let response = client
        .post(
            &format!("/admin/orders/{}/cancel", cart["id"].as_str().unwrap()),
            json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let complete = create_complete_order(&mut client, hub.id).await.unwrap();
    let id = complete["id"].as_str().unwrap();
    client
        .post(&format!("/admin/orders/{}/cancel", id), json!({}))
        .await
        .unwrap();

    let response = client
        .post(&format!("/admin/orders/{}/resume", id), json!({}))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let resumed = response.json();
    assert_eq!(resumed["state"], "resumed");
    assert_eq!(resumed["shipment_state"], "ready");
    assert_eq!(resumed["payment_state"], "paid");
}

#[tokio::test]
async fn test_voucher_discounts_cart() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    client
        .post(
            &format!("/admin/enterprises/{}/vouchers", hub.id),
            json!({ "code": "SPRING", "voucher_type": "percentage", "amount": "10" }),
        )
        .await
        .unwrap();

    let cart = create_cart(&mut client, hub.id, 3, "5.00").await.unwrap();
    let id = cart["id"].as_str().unwrap();

    let response = client
        .post(
            &format!("/admin/orders/{}/voucher", id),
            json!({ "code": "WINTER" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error_message(),
        "Voucher code 'WINTER' is not valid for this shop"
    );

    let response = client
        .post(
            &format!("/admin/orders/{}/voucher", id),
            json!({ "code": " SPRING " }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let discounted = response.json();
    assert_eq!(discounted["voucher_code"], "SPRING");
    assert_eq!(discounted["item_total"], "15.00");
    assert_eq!(discounted["voucher_discount"], "1.50");
    assert_eq!(discounted["total"], "13.50");

    // the discount follows the cart
    let response = client
        .post(
            &format!("/admin/orders/{}/line_items", id),
            json!({ "name": "Kale", "quantity": 1, "price": "5.00" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    let grown = response.json();
    assert_eq!(grown["voucher_discount"], "2.00");
    assert_eq!(grown["total"], "18.00");
}

#[tokio::test]
async fn test_deleted_voucher_is_dropped_on_next_change() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();
    let vouchers = format!("/admin/enterprises/{}/vouchers", hub.id);

    client
        .post(
            &vouchers,
            json!({ "code": "FLAT2", "voucher_type": "flat", "amount": "2.00" }),
        )
        .await
        .unwrap();
    let cart = create_cart(&mut client, hub.id, 2, "5.00").await.unwrap();
    let id = cart["id"].as_str().unwrap();
    let applied = client
        .post(
            &format!("/admin/orders/{}/voucher", id),
            json!({ "code": "FLAT2" }),
        )
        .await
        .unwrap()
        .json();
    assert_eq!(applied["total"], "8.00");

    let response = client.delete(&format!("{}/FLAT2", vouchers)).await.unwrap();
    assert!(response.status.is_success());

    let response = client
        .post(
            &format!("/admin/orders/{}/line_items", id),
            json!({ "name": "Kale", "quantity": 1, "price": "1.00" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    let grown = response.json();
    assert!(grown["voucher_code"].is_null());
    assert_eq!(grown["voucher_discount"], "0.00");
    assert_eq!(grown["total"], "11.00");
}

#[tokio::test]
async fn test_oversized_line_items_are_rejected() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    let response = client
        .post(
            "/admin/orders",
            json!({
                "distributor_id": hub.id,
                "email": "customer@example.com",
                "line_items": [{ "name": "Carrots", "quantity": 900000000000000000i64, "price": "10.00" }],
            }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Amount is out of range");

    let cart = create_cart(&mut client, hub.id, 1, "1.00").await.unwrap();
    let id = cart["id"].as_str().unwrap();
    let big = json!({ "name": "Kale", "quantity": 4000000000000000000i64, "price": "0.01" });
    let response = client
        .post(&format!("/admin/orders/{}/line_items", id), big.clone())
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);

    // a second one would overflow the order total
    let response = client
        .post(&format!("/admin/orders/{}/line_items", id), big.clone())
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    let response = client
        .post(&format!("/admin/orders/{}/line_items", id), big)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_message(), "Amount is out of range");
    let unchanged = client
        .get(&format!("/admin/orders/{}", id))
        .await
        .unwrap()
        .json();
    assert_eq!(unchanged["line_items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_orders_are_scoped_to_managed_distributors() {
    let app = TestApp::new().await.unwrap();
    let (manager, mut client) = app
        .login_as("manager@example.com", UserRole::User)
        .await
        .unwrap();
    let (_, mut stranger) = app
        .login_as("stranger@example.com", UserRole::User)
        .await
        .unwrap();
    let hub = app.create_enterprise(manager.id, "City Hub").await.unwrap();

    let cart = create_cart(&mut client, hub.id, 1, "2.50").await.unwrap();

    let response = stranger
        .get(&format!("/admin/orders/{}", cart["id"].as_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(stranger
        .get("/admin/orders")
        .await
        .unwrap()
        .json()
        .as_array()
        .unwrap()
        .is_empty());

    let response = stranger
        .post(
            "/admin/orders",
            json!({ "distributor_id": hub.id, "email": "x@example.com" }),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
