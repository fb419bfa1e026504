//! In-memory email capture for tests
//!
//! Clones share the same outbox, so a test can keep a handle while the
//! application owns another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
}

#[derive(Debug, Clone, Default)]
pub struct MockEmailService {
    outbox: Arc<Mutex<Vec<CapturedEmail>>>,
    failing: Arc<AtomicBool>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    fn outbox(&self) -> std::sync::MutexGuard<'_, Vec<CapturedEmail>> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Messages addressed to `recipient`, oldest first
    pub fn get_emails_for_recipient(&self, recipient: &str) -> Vec<CapturedEmail> {
        self.outbox()
            .iter()
            .filter(|email| email.message.to == recipient)
            .cloned()
            .collect()
    }

    pub fn email_count(&self) -> usize {
        self.outbox().len()
    }

    pub fn clear(&self) {
        self.outbox().clear();
    }

    /// Make every subsequent send fail with a delivery error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailError::Delivery("mock outbox is failing".to_string()));
        }
        message.check_addresses()?;

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            provider: "mock",
            sent_at: Utc::now(),
        };
        tracing::debug!(kind = ?message.kind, to = %message.to, "Mock email captured");

        self.outbox().push(CapturedEmail {
            message,
            receipt: receipt.clone(),
        });
        Ok(receipt)
    }

    fn from_address(&self) -> &str {
        "orders@foodhub.test"
    }

    fn storefront_url(&self) -> &str {
        "http://localhost:3000"
    }
}
