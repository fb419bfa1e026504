//! HTTP Payment Gateway Client
//!
//! Talks to a payment-intent style gateway API over JSON:
//! `POST /v1/payment_intents`, `/v1/payment_intents/{id}/capture`,
//! `/v1/payment_intents/{id}/cancel` and `POST /v1/refunds`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{AuthorizeRequest, PaymentConfig, PaymentError, PaymentGateway, PaymentIntent, Refund};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct CreateIntentBody<'a> {
    amount: i64,
    currency: &'a str,
    capture_method: &'a str,
    metadata: IntentMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct IntentMetadata<'a> {
    order_number: &'a str,
}

#[derive(Debug, Serialize)]
struct CaptureBody {
    amount_to_capture: i64,
}

#[derive(Debug, Serialize)]
struct RefundBody<'a> {
    payment_intent: &'a str,
    amount: i64,
}

/// Gateway error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
    message: String,
}

/// HTTP payment gateway implementation
pub struct HttpGateway {
    client: Client,
    config: PaymentConfig,
}

impl HttpGateway {
    pub fn new(config: PaymentConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, PaymentError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending payment gateway request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(classify_error(status, &error_body));
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Response(format!("Failed to parse response: {}", e)))
    }
}

/// Card errors and 402s are declines the user can act on; anything else
/// is an infrastructure failure.
fn classify_error(status: StatusCode, body: &str) -> PaymentError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error })
            if status == StatusCode::PAYMENT_REQUIRED
                || error.error_type.as_deref() == Some("card_error")
                || error.error_type.as_deref() == Some("invalid_request_error") =>
        {
            PaymentError::Declined {
                code: error.code,
                message: error.message,
            }
        }
        Ok(ErrorResponse { error }) => PaymentError::Response(format!(
            "Gateway returned {}: {}",
            status, error.message
        )),
        Err(_) => PaymentError::Response(format!("Gateway returned {}: {}", status, body)),
    }
}

#[async_trait::async_trait]
impl PaymentGateway for HttpGateway {
    async fn authorize(&self, request: AuthorizeRequest) -> Result<PaymentIntent, PaymentError> {
        let body = CreateIntentBody {
            amount: request.amount_cents,
            currency: &request.currency,
            capture_method: "manual",
            metadata: IntentMetadata {
                order_number: &request.order_number,
            },
        };
        let intent: PaymentIntent = self.post("/v1/payment_intents", &body).await?;
        tracing::info!(intent_id = %intent.id, status = ?intent.status, "Payment authorized");
        Ok(intent)
    }

    async fn capture(
        &self,
        intent_id: &str,
        amount_cents: i64,
    ) -> Result<PaymentIntent, PaymentError> {
        let path = format!("/v1/payment_intents/{}/capture", intent_id);
        let intent: PaymentIntent = self
            .post(
                &path,
                &CaptureBody {
                    amount_to_capture: amount_cents,
                },
            )
            .await?;
        tracing::info!(intent_id = %intent.id, status = ?intent.status, "Payment captured");
        Ok(intent)
    }

    async fn cancel(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        let path = format!("/v1/payment_intents/{}/cancel", intent_id);
        self.post(&path, &serde_json::json!({})).await
    }

    async fn refund(&self, intent_id: &str, amount_cents: i64) -> Result<Refund, PaymentError> {
        self.post(
            "/v1/refunds",
            &RefundBody {
                payment_intent: intent_id,
                amount: amount_cents,
            },
        )
        .await
    }
}
