//! Amazon SES delivery

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_REGION: &str = "us-east-1";

pub struct SesEmailService {
    client: SesClient,
    from_address: String,
    storefront_url: String,
}

impl SesEmailService {
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let region = Region::new(
            config
                .aws_region
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        );
        let sdk_config = load_sdk_config(region, config.aws_endpoint_url.as_deref()).await;

        Ok(Self {
            client: SesClient::new(&sdk_config),
            from_address: config.from_address,
            storefront_url: config.storefront_url,
        })
    }
}

/// LocalStack accepts any static credentials; real AWS uses the default chain.
async fn load_sdk_config(region: Region, endpoint_url: Option<&str>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    match endpoint_url {
        Some(endpoint_url) => {
            tracing::info!(endpoint_url, "Using custom SES endpoint");
            let credentials = Credentials::new("test", "test", None, None, "foodhub-localstack");
            loader
                .endpoint_url(endpoint_url)
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .load()
                .await
        }
        None => loader.load().await,
    }
}

fn utf8(data: &str, part: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::Delivery(format!("Invalid {}: {}", part, e)))
}

fn ses_message(message: &EmailMessage) -> Result<Message, EmailError> {
    let mut body = Body::builder().text(utf8(&message.body_text, "text body")?);
    if let Some(html) = &message.body_html {
        body = body.html(utf8(html, "HTML body")?);
    }

    Ok(Message::builder()
        .subject(utf8(&message.subject, "subject")?)
        .body(body.build())
        .build())
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        message.check_addresses()?;

        let output = self
            .client
            .send_email()
            .source(&message.from)
            .destination(Destination::builder().to_addresses(&message.to).build())
            .message(ses_message(&message)?)
            .send()
            .await
            .map_err(|e| EmailError::Delivery(e.to_string()))?;

        tracing::info!(
            kind = ?message.kind,
            to = %message.to,
            message_id = %output.message_id(),
            "Email sent via SES"
        );

        Ok(EmailReceipt {
            message_id: output.message_id().to_string(),
            provider: "ses",
            sent_at: Utc::now(),
        })
    }

    fn from_address(&self) -> &str {
        &self.from_address
    }

    fn storefront_url(&self) -> &str {
        &self.storefront_url
    }
}
