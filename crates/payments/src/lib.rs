//! FoodHub Payment Gateway
//!
//! Provides card payment processing through third-party gateways:
//! - HTTP client for payment-intent style gateway APIs
//! - Mock gateway for testing and development
//! - Configurable provider, endpoint, and programmable mock behavior

pub mod http;
pub mod mock;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Payment configuration error: {0}")]
    Configuration(String),

    #[error("Payment request error: {0}")]
    Request(String),

    #[error("Payment response error: {0}")]
    Response(String),

    /// The gateway refused the operation; `message` is shown to the user
    #[error("{message}")]
    Declined {
        code: Option<String>,
        message: String,
    },
}

impl PaymentError {
    /// Human-readable reason stored on a failed payment.
    pub fn reason(&self) -> String {
        match self {
            PaymentError::Declined { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Lifecycle status of a gateway payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
}

impl IntentStatus {
    /// The customer still has to authenticate the card (3-D Secure)
    pub fn needs_customer_action(&self) -> bool {
        matches!(
            self,
            IntentStatus::RequiresAction
                | IntentStatus::RequiresPaymentMethod
                | IntentStatus::RequiresConfirmation
        )
    }
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresCapture => "requires_capture",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Succeeded => "succeeded",
        };
        write!(f, "{}", status)
    }
}

/// Request to authorize (but not capture) an amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub order_number: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// Gateway payment intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: IntentStatus,
    #[serde(rename = "amount")]
    pub amount_cents: i64,
}

/// Gateway refund record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub status: String,
    #[serde(rename = "amount")]
    pub amount_cents: i64,
}

/// Payment gateway configuration
#[derive(Clone)]
pub struct PaymentConfig {
    pub provider: String,
    pub base_url: String,
    pub api_key: String,
    pub currency: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("currency", &self.currency)
            .finish()
    }
}

impl PaymentConfig {
    /// Create payment config from environment variables
    pub fn from_env() -> Result<Self, PaymentError> {
        let provider = std::env::var("PAYMENT_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let base_url = std::env::var("PAYMENT_GATEWAY_URL").unwrap_or_default();
        let api_key = std::env::var("PAYMENT_GATEWAY_API_KEY").unwrap_or_default();
        let currency = std::env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string());

        if provider == "http" && (base_url.is_empty() || api_key.is_empty()) {
            return Err(PaymentError::Configuration(
                "PAYMENT_GATEWAY_URL and PAYMENT_GATEWAY_API_KEY are required for the http provider"
                    .to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            api_key,
            currency,
        })
    }
}

/// Payment gateway trait for different processors
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Authorize an amount without capturing it.
    async fn authorize(&self, request: AuthorizeRequest) -> Result<PaymentIntent, PaymentError>;

    /// Capture a previously authorized intent.
    async fn capture(&self, intent_id: &str, amount_cents: i64)
        -> Result<PaymentIntent, PaymentError>;

    /// Release an authorization that was never captured.
    async fn cancel(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError>;

    /// Refund a captured intent.
    async fn refund(&self, intent_id: &str, amount_cents: i64) -> Result<Refund, PaymentError>;
}

/// Factory for creating PaymentGateway implementations
pub struct PaymentGatewayFactory;

impl PaymentGatewayFactory {
    pub fn create(config: PaymentConfig) -> Result<Arc<dyn PaymentGateway>, PaymentError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!(base_url = %config.base_url, "Creating HTTP payment gateway");
                Ok(Arc::new(http::HttpGateway::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock payment gateway");
                Ok(Arc::new(mock::MockGateway::new()))
            }
            provider => Err(PaymentError::Configuration(format!(
                "Unknown payment provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
