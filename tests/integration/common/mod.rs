//! Common test utilities and fixtures for integration tests
//!
//! - `TestApp`: full router on a fresh in-memory database with mock
//!   payment gateway and email provider
//! - `TestClient`: in-process client carrying the session cookie
//! - Fixtures for users, enterprises and orders

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use foodhub_accounts::{NewUser, User, UserRepository, UserRole};
use foodhub_app::{create_app, AppServices};
use foodhub_common::{db::connect_in_memory, Config, DbPool};
use foodhub_email::mock::MockEmailService;
use foodhub_enterprises::{Enterprise, EnterpriseRepository};
use foodhub_payments::{mock::MockGateway, PaymentGateway};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Password given to every fixture user
pub const PASSWORD: &str = "password123";

/// Test application with its database and outbound mocks
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub config: Config,
    pub gateway: MockGateway,
    pub email: MockEmailService,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_env(&[]).await
    }

    /// Build the app with configuration taken from `pairs` only.
    pub async fn with_env(pairs: &[(&str, &str)]) -> Result<Self> {
        let gateway = MockGateway::new();
        let app = Self::with_gateway(pairs, Arc::new(gateway.clone())).await?;
        Ok(Self { gateway, ..app })
    }

    /// Build the app around an arbitrary payment gateway.
    pub async fn with_gateway(
        pairs: &[(&str, &str)],
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self> {
        let config = Config::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })?;
        let pool = connect_in_memory().await?;
        let email = MockEmailService::new();

        let services = AppServices {
            gateway,
            email: Arc::new(email.clone()),
        };
        let router = create_app(&config, pool.clone(), services);

        Ok(Self {
            router,
            pool,
            config,
            gateway: MockGateway::new(),
            email,
        })
    }

    /// Client without a session
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn create_user(&self, email: &str, role: UserRole) -> Result<User> {
        let new_user = NewUser::new(email, PASSWORD, role, 5)?;
        Ok(UserRepository::new(self.pool.clone()).create(&new_user).await?)
    }

    pub async fn create_enterprise(&self, owner_id: Uuid, name: &str) -> Result<Enterprise> {
        let enterprise = Enterprise::new(name, owner_id)?;
        Ok(EnterpriseRepository::new(self.pool.clone())
            .create(&enterprise)
            .await?)
    }

    /// Create a user and log them in
    pub async fn login_as(&self, email: &str, role: UserRole) -> Result<(User, TestClient)> {
        let user = self.create_user(email, role).await?;
        let mut client = self.client();
        client.login(email, PASSWORD).await?;
        Ok((user, client))
    }
}

/// Buffered response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
    }

    /// Message of a `{"error": {...}}` body
    pub fn error_message(&self) -> String {
        self.json()["error"]["message"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

/// In-process HTTP client keeping the session cookie between requests
#[derive(Clone)]
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await?.to_vec();

        if let Some(set_cookie) = headers.get(SET_COOKIE).and_then(|v| v.to_str().ok()) {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            self.cookie = pair
                .split_once('=')
                .filter(|(_, value)| !value.is_empty())
                .map(|_| pair.clone());
        }

        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&mut self, uri: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, None, Body::empty()).await
    }

    pub async fn delete(&mut self, uri: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, None, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send_json(Method::PUT, uri, body).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send_json(Method::PATCH, uri, body).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> Result<TestResponse> {
        self.request(
            Method::POST,
            uri,
            Some("application/x-www-form-urlencoded"),
            Body::from(form.to_string()),
        )
        .await
    }

    async fn send_json(&mut self, method: Method, uri: &str, body: Value) -> Result<TestResponse> {
        self.request(
            method,
            uri,
            Some("application/json"),
            Body::from(serde_json::to_vec(&body)?),
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<TestResponse> {
        let response = self
            .post("/login", json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(
            response.status == StatusCode::SEE_OTHER,
            "login failed with {}",
            response.status
        );
        Ok(response)
    }

    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }
}

/// Create a cart with one line item of `quantity` x `price`.
pub async fn create_cart(
    client: &mut TestClient,
    distributor_id: Uuid,
    quantity: i64,
    price: &str,
) -> Result<Value> {
    let response = client
        .post(
            "/admin/orders",
            json!({
                "distributor_id": distributor_id,
                "email": "customer@example.com",
                "line_items": [{ "name": "Carrots", "quantity": quantity, "price": price }],
            }),
        )
        .await?;
    anyhow::ensure!(
        response.status == StatusCode::CREATED,
        "order creation failed: {} {}",
        response.status,
        response.error_message()
    );
    Ok(response.json())
}

/// Check out `order_id` with `payment_method` and return the order.
pub async fn checkout(
    client: &mut TestClient,
    order_id: &str,
    payment_method: &str,
) -> Result<TestResponse> {
    client
        .post(
            &format!("/admin/orders/{}/checkout", order_id),
            json!({ "payment_method": payment_method }),
        )
        .await
}

/// Id of the latest payment in an order detail body
pub fn latest_payment_id(order: &Value) -> Result<String> {
    order["payments"]
        .as_array()
        .and_then(|payments| payments.last())
        .and_then(|payment| payment["id"].as_str())
        .map(str::to_string)
        .context("order has no payments")
}

/// A cart paid by check and captured: state `complete`.
pub async fn create_complete_order(
    client: &mut TestClient,
    distributor_id: Uuid,
) -> Result<Value> {
    let cart = create_cart(client, distributor_id, 2, "5.00").await?;
    let order_id = cart["id"].as_str().context("order id")?.to_string();

    let order = checkout(client, &order_id, "check").await?.json();
    let payment_id = latest_payment_id(&order)?;

    let response = client
        .post(
            &format!("/admin/orders/{}/payments/{}/capture", order_id, payment_id),
            json!({}),
        )
        .await?;
    anyhow::ensure!(
        response.status == StatusCode::OK,
        "capture failed: {}",
        response.error_message()
    );
    Ok(response.json())
}
