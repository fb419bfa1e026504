//! Mock Payment Gateway Implementation
//!
//! Programmable mock for testing payment workflows:
//! - `MockGateway`: configurable mock with call recording
//! - `MockGatewayBehavior`: controls the outcome of each operation
//! - `MockOutcome`: Succeed, RequireAction, or Decline

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::{AuthorizeRequest, IntentStatus, PaymentError, PaymentGateway, PaymentIntent, Refund};

/// Default reason attached to declined operations
pub const DEFAULT_DECLINE_REASON: &str = "Your card was declined.";

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    #[default]
    Succeed,
    /// Authorization needs customer authentication (3-D Secure)
    RequireAction,
    /// Gateway refuses with the configured reason
    Decline,
}

/// Programmable behavior for the mock gateway
#[derive(Debug, Clone)]
pub struct MockGatewayBehavior {
    pub authorize: Arc<RwLock<MockOutcome>>,
    pub capture: Arc<RwLock<MockOutcome>>,
    pub cancel: Arc<RwLock<MockOutcome>>,
    pub refund: Arc<RwLock<MockOutcome>>,
    pub decline_reason: Arc<RwLock<String>>,
}

impl Default for MockGatewayBehavior {
    fn default() -> Self {
        Self {
            authorize: Arc::new(RwLock::new(MockOutcome::Succeed)),
            capture: Arc::new(RwLock::new(MockOutcome::Succeed)),
            cancel: Arc::new(RwLock::new(MockOutcome::Succeed)),
            refund: Arc::new(RwLock::new(MockOutcome::Succeed)),
            decline_reason: Arc::new(RwLock::new(DEFAULT_DECLINE_REASON.to_string())),
        }
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

impl MockGatewayBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_authorize(&self, outcome: MockOutcome) {
        write(&self.authorize, outcome);
    }

    pub fn set_capture(&self, outcome: MockOutcome) {
        write(&self.capture, outcome);
    }

    pub fn set_cancel(&self, outcome: MockOutcome) {
        write(&self.cancel, outcome);
    }

    pub fn set_refund(&self, outcome: MockOutcome) {
        write(&self.refund, outcome);
    }

    pub fn set_decline_reason(&self, reason: impl Into<String>) {
        write(&self.decline_reason, reason.into());
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.set_authorize(MockOutcome::Succeed);
        self.set_capture(MockOutcome::Succeed);
        self.set_cancel(MockOutcome::Succeed);
        self.set_refund(MockOutcome::Succeed);
        self.set_decline_reason(DEFAULT_DECLINE_REASON);
    }

    fn decline(&self) -> PaymentError {
        PaymentError::Declined {
            code: Some("card_declined".to_string()),
            message: read(&self.decline_reason),
        }
    }
}

/// Gateway operation recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOperation {
    Authorize,
    Capture,
    Cancel,
    Refund,
}

/// A recorded gateway call for test assertions
#[derive(Debug, Clone)]
pub struct RecordedGatewayCall {
    pub operation: GatewayOperation,
    pub intent_id: Option<String>,
    pub amount_cents: Option<i64>,
}

/// Mock payment gateway with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    behavior: Arc<MockGatewayBehavior>,
    history: Arc<Mutex<Vec<RecordedGatewayCall>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockGatewayBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared behavior for configuration from tests
    pub fn behavior(&self) -> &Arc<MockGatewayBehavior> {
        &self.behavior
    }

    /// Get recorded gateway calls
    pub fn recorded_calls(&self) -> Vec<RecordedGatewayCall> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear history
    pub fn reset_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, operation: GatewayOperation, intent_id: Option<&str>, amount: Option<i64>) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedGatewayCall {
                operation,
                intent_id: intent_id.map(str::to_string),
                amount_cents: amount,
            });
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    async fn authorize(&self, request: AuthorizeRequest) -> Result<PaymentIntent, PaymentError> {
        self.record(GatewayOperation::Authorize, None, Some(request.amount_cents));
        let status = match read(&self.behavior.authorize) {
            MockOutcome::Succeed => IntentStatus::RequiresCapture,
            MockOutcome::RequireAction => IntentStatus::RequiresAction,
            MockOutcome::Decline => return Err(self.behavior.decline()),
        };
        let intent = PaymentIntent {
            id: format!("pi_mock_{}", uuid::Uuid::new_v4().simple()),
            status,
            amount_cents: request.amount_cents,
        };
        tracing::info!(intent_id = %intent.id, order_number = %request.order_number, "Mock payment authorized");
        Ok(intent)
    }

    async fn capture(
        &self,
        intent_id: &str,
        amount_cents: i64,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record(GatewayOperation::Capture, Some(intent_id), Some(amount_cents));
        match read(&self.behavior.capture) {
            MockOutcome::Decline => Err(self.behavior.decline()),
            MockOutcome::RequireAction => Ok(PaymentIntent {
                id: intent_id.to_string(),
                status: IntentStatus::RequiresAction,
                amount_cents,
            }),
            MockOutcome::Succeed => Ok(PaymentIntent {
                id: intent_id.to_string(),
                status: IntentStatus::Succeeded,
                amount_cents,
            }),
        }
    }

    async fn cancel(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        self.record(GatewayOperation::Cancel, Some(intent_id), None);
        match read(&self.behavior.cancel) {
            MockOutcome::Decline => Err(self.behavior.decline()),
            _ => Ok(PaymentIntent {
                id: intent_id.to_string(),
                status: IntentStatus::Canceled,
                amount_cents: 0,
            }),
        }
    }

    async fn refund(&self, intent_id: &str, amount_cents: i64) -> Result<Refund, PaymentError> {
        self.record(GatewayOperation::Refund, Some(intent_id), Some(amount_cents));
        match read(&self.behavior.refund) {
            MockOutcome::Decline => Err(self.behavior.decline()),
            _ => Ok(Refund {
                id: format!("re_mock_{}", uuid::Uuid::new_v4().simple()),
                status: "succeeded".to_string(),
                amount_cents,
            }),
        }
    }
}
