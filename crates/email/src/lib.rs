//! Customer notification email
//!
//! Delivery goes through an [`EmailService`]: Amazon SES in production
//! (LocalStack when `AWS_ENDPOINT_URL` is set) or an in-memory mock for
//! tests. Notification bodies live in [`content`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aws_ses;
pub mod content;
pub mod mock;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

/// What a message notifies the customer about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    OrderCancellation,
}

/// Outgoing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub kind: EmailKind,
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

impl EmailMessage {
    /// Reject addresses without a mailbox and a domain part.
    pub fn check_addresses(&self) -> Result<(), EmailError> {
        for address in [&self.to, &self.from] {
            match address.split_once('@') {
                Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
                _ => return Err(EmailError::InvalidAddress(address.clone())),
            }
        }
        Ok(())
    }
}

/// Provider acknowledgement of a sent message
#[derive(Debug, Clone)]
pub struct EmailReceipt {
    pub message_id: String,
    pub provider: &'static str,
    pub sent_at: DateTime<Utc>,
}

/// Details shown in an order cancellation email
#[derive(Debug, Clone)]
pub struct OrderCancellation<'a> {
    pub order_number: &'a str,
    pub distributor_name: &'a str,
    pub recipient: &'a str,
    /// Order total, already formatted in the shop currency
    pub total: &'a str,
}

/// Email delivery settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `ses` or `mock`
    pub provider: String,
    pub aws_region: Option<String>,
    /// Custom SES endpoint (LocalStack)
    pub aws_endpoint_url: Option<String>,
    pub from_address: String,
    /// When false every message is captured by the mock instead
    pub enabled: bool,
    /// Storefront link included in notifications
    pub storefront_url: String,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EmailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = match lookup("EMAIL_ENABLED").as_deref() {
            None | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(EmailError::Configuration(format!(
                    "EMAIL_ENABLED must be true or false, got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            provider: lookup("EMAIL_PROVIDER").unwrap_or_else(|| "mock".to_string()),
            aws_region: lookup("AWS_REGION"),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL"),
            from_address: lookup("FROM_EMAIL")
                .unwrap_or_else(|| "orders@foodhub.local".to_string()),
            enabled,
            storefront_url: lookup("APP_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}

#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Sender address for notifications
    fn from_address(&self) -> &str;

    fn storefront_url(&self) -> &str;

    /// Tell a customer their order was canceled
    async fn send_order_cancellation(
        &self,
        cancellation: OrderCancellation<'_>,
    ) -> Result<EmailReceipt, EmailError> {
        let message = EmailMessage {
            kind: EmailKind::OrderCancellation,
            to: cancellation.recipient.to_string(),
            from: self.from_address().to_string(),
            subject: format!("Order {} has been canceled", cancellation.order_number),
            body_text: content::order_cancellation_text(&cancellation, self.storefront_url()),
            body_html: Some(content::order_cancellation_html(
                &cancellation,
                self.storefront_url(),
            )),
        };
        self.send_email(message).await
    }
}

pub struct EmailServiceFactory;

impl EmailServiceFactory {
    pub async fn create(config: EmailConfig) -> Result<Arc<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email delivery disabled, capturing messages in memory");
            return Ok(Arc::new(mock::MockEmailService::new()));
        }

        match config.provider.as_str() {
            "ses" | "aws-ses" => {
                tracing::info!(region = ?config.aws_region, "Creating SES email service");
                Ok(Arc::new(aws_ses::SesEmailService::new(config).await?))
            }
            "mock" => Ok(Arc::new(mock::MockEmailService::new())),
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: ses, mock",
                provider
            ))),
        }
    }
}
