//! Payment capture through the HTTP gateway client
//!
//! The gateway is replaced at the network boundary by an in-process stub
//! answering with canned JSON. Intents authorized for 6.66 are declined
//! on capture.

#![allow(dead_code)]

mod common;

use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
use foodhub_accounts::UserRole;
use foodhub_payments::{http::HttpGateway, PaymentConfig};
use serde_json::{json, Value};

use common::{checkout, create_cart, latest_payment_id, TestApp};

const DECLINED_AMOUNT: i64 = 666;

async fn spawn_gateway_stub() -> String {
    let app = Router::new()
        .route(
            "/v1/payment_intents",
            post(|Json(body): Json<Value>| async move {
                let amount = body["amount"].as_i64().unwrap_or_default();
                let id = if amount == DECLINED_AMOUNT {
                    "pi_stub_declined"
                } else {
                    "pi_stub_ok"
                };
                Json(json!({
                    "id": id,
                    "object": "payment_intent",
                    "amount": amount,
                    "status": "requires_capture",
                }))
            }),
        )
        .route(
            "/v1/payment_intents/{id}/capture",
            post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                if id.ends_with("_declined") {
                    return (
                        StatusCode::PAYMENT_REQUIRED,
                        Json(json!({ "error": {
                            "type": "card_error",
                            "code": "insufficient_funds",
                            "message": "Your card has insufficient funds.",
                        }})),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": id,
                        "amount": body["amount_to_capture"],
                        "status": "succeeded",
                    })),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn app_with_stub() -> TestApp {
    let gateway = HttpGateway::new(PaymentConfig {
        provider: "http".to_string(),
        base_url: spawn_gateway_stub().await,
        api_key: "sk_test_stub".to_string(),
        currency: "USD".to_string(),
    })
    .unwrap();
    TestApp::with_gateway(&[], Arc::new(gateway)).await.unwrap()
}

#[tokio::test]
async fn test_declined_capture_leaves_payment_failed() {
    let app = app_with_stub().await;
    let (admin, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let hub = app.create_enterprise(admin.id, "City Hub").await.unwrap();

    let cart = create_cart(&mut client, hub.id, 1, "6.66").await.unwrap();
    let id = cart["id"].as_str().unwrap();
    let order = checkout(&mut client, id, "gateway").await.unwrap().json();
    assert_eq!(order["payments"][0]["response_code"], "pi_stub_declined");
    let payment_id = latest_payment_id(&order).unwrap();

    let response = client
        .post(
            &format!("/admin/orders/{}/payments/{}/capture", id, payment_id),
            json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_message(), "Your card has insufficient funds.");

    let reloaded = client
        .get(&format!("/admin/orders/{}", id))
        .await
        .unwrap()
        .json();
    let latest = reloaded["payments"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(latest["state"], "failed");
    assert_eq!(latest["failure_reason"], "Your card has insufficient funds.");
    assert_ne!(reloaded["state"], "complete");
}

#[tokio::test]
async fn test_successful_capture_completes_order() {
    let app = app_with_stub().await;
    let (admin, mut client) = app
        .login_as("admin@example.com", UserRole::Admin)
        .await
        .unwrap();
    let hub = app.create_enterprise(admin.id, "City Hub").await.unwrap();

    let cart = create_cart(&mut client, hub.id, 2, "4.25").await.unwrap();
    let id = cart["id"].as_str().unwrap();
    let order = checkout(&mut client, id, "gateway").await.unwrap().json();
    let payment_id = latest_payment_id(&order).unwrap();

    let response = client
        .post(
            &format!("/admin/orders/{}/payments/{}/capture", id, payment_id),
            json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let completed = response.json();
    assert_eq!(completed["state"], "complete");
    assert_eq!(completed["payment_state"], "paid");
    assert_eq!(completed["payments"][0]["state"], "completed");
}
