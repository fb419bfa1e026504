//! State machines for Orders domain entities
//!
//! Each state machine defines:
//! - Valid states
//! - Events that trigger transitions
//! - Guard conditions for transitions
//! - Terminal states

use foodhub_common::StateError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order State Machine
// ============================================================================

/// Order checkout states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Cart,
    Payment,
    Complete,
    Canceled,
    Resumed,
}

impl OrderState {
    /// Complete and resumed orders count as placed
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Complete | Self::Resumed)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [OrderState] {
        match self {
            Self::Cart => &[Self::Payment],
            Self::Payment => &[Self::Complete],
            Self::Complete => &[Self::Canceled],
            Self::Canceled => &[Self::Resumed],
            Self::Resumed => &[Self::Canceled],
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cart => write!(f, "cart"),
            Self::Payment => write!(f, "payment"),
            Self::Complete => write!(f, "complete"),
            Self::Canceled => write!(f, "canceled"),
            Self::Resumed => write!(f, "resumed"),
        }
    }
}

/// Events that trigger order state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// Customer details confirmed, payment expected
    Checkout,
    /// Payments cover the order total
    Complete,
    /// Shop cancels a placed order
    Cancel,
    /// Shop reinstates a canceled order
    Resume,
}

impl std::fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkout => write!(f, "checkout"),
            Self::Complete => write!(f, "complete"),
            Self::Cancel => write!(f, "cancel"),
            Self::Resume => write!(f, "resume"),
        }
    }
}

/// Guard context for order transitions
#[derive(Debug, Clone, Default)]
pub struct OrderGuardContext {
    pub line_item_count: usize,
    /// Completed payments cover the order total
    pub is_paid: bool,
}

/// Order state machine
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Attempt a state transition with guard conditions
    pub fn transition(
        current: OrderState,
        event: OrderEvent,
        context: Option<&OrderGuardContext>,
    ) -> Result<OrderState, StateError> {
        let next = match (&current, &event) {
            (OrderState::Cart, OrderEvent::Checkout) => {
                // Guard: nothing to pay for in an empty cart
                if let Some(ctx) = context {
                    if ctx.line_item_count == 0 {
                        return Err(StateError::GuardFailed(
                            "Order has no line items".to_string(),
                        ));
                    }
                }
                OrderState::Payment
            }
            (OrderState::Payment, OrderEvent::Complete) => {
                if let Some(ctx) = context {
                    if !ctx.is_paid {
                        return Err(StateError::GuardFailed(
                            "Order has not been paid in full".to_string(),
                        ));
                    }
                }
                OrderState::Complete
            }
            (OrderState::Complete | OrderState::Resumed, OrderEvent::Cancel) => OrderState::Canceled,
            (OrderState::Canceled, OrderEvent::Resume) => OrderState::Resumed,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: OrderState, event: &OrderEvent) -> bool {
        Self::transition(current, event.clone(), None).is_ok()
    }
}

/// Fulfilment state, always derived from the order state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShipmentState {
    Pending,
    Ready,
    Canceled,
}

impl ShipmentState {
    pub fn for_order(state: OrderState) -> Self {
        match state {
            OrderState::Cart | OrderState::Payment => Self::Pending,
            OrderState::Complete | OrderState::Resumed => Self::Ready,
            OrderState::Canceled => Self::Canceled,
        }
    }
}

impl std::fmt::Display for ShipmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Ready => write!(f, "ready"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

// ============================================================================
// Payment State Machine
// ============================================================================

/// Payment states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Checkout,
    Pending,
    RequiresAuthorization,
    Processing,
    Completed,
    Failed,
    Void,
}

impl PaymentState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Void)
    }

    /// Still waiting on authorization or capture
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Checkout | Self::Pending | Self::RequiresAuthorization | Self::Processing
        )
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [PaymentState] {
        match self {
            Self::Checkout => &[
                Self::Pending,
                Self::RequiresAuthorization,
                Self::Failed,
                Self::Void,
            ],
            Self::Pending => &[Self::Processing, Self::Void],
            Self::RequiresAuthorization => &[Self::Void],
            Self::Processing => &[Self::Completed, Self::Failed],
            Self::Completed => &[Self::Void],
            Self::Failed => &[],
            Self::Void => &[],
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkout => write!(f, "checkout"),
            Self::Pending => write!(f, "pending"),
            Self::RequiresAuthorization => write!(f, "requires_authorization"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Events that trigger payment state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    /// Gateway (or shop, for offline methods) holds the funds
    Authorize,
    /// Customer must authenticate the card first
    RequireAuthorization,
    /// Capture requested
    Capture,
    /// Capture succeeded
    Complete,
    /// Gateway refused
    Fail,
    Void,
}

impl std::fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorize => write!(f, "authorize"),
            Self::RequireAuthorization => write!(f, "require_authorization"),
            Self::Capture => write!(f, "capture"),
            Self::Complete => write!(f, "complete"),
            Self::Fail => write!(f, "fail"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Payment state machine
pub struct PaymentStateMachine;

impl PaymentStateMachine {
    /// Attempt a state transition
    pub fn transition(current: PaymentState, event: PaymentEvent) -> Result<PaymentState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (PaymentState::Checkout, PaymentEvent::Authorize) => PaymentState::Pending,
            (PaymentState::Checkout, PaymentEvent::RequireAuthorization) => {
                PaymentState::RequiresAuthorization
            }
            (PaymentState::Checkout, PaymentEvent::Fail) => PaymentState::Failed,
            (PaymentState::Pending, PaymentEvent::Capture) => PaymentState::Processing,
            (PaymentState::Processing, PaymentEvent::Complete) => PaymentState::Completed,
            (PaymentState::Processing, PaymentEvent::Fail) => PaymentState::Failed,
            (
                PaymentState::Checkout
                | PaymentState::Pending
                | PaymentState::RequiresAuthorization
                | PaymentState::Completed,
                PaymentEvent::Void,
            ) => PaymentState::Void,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: PaymentState, event: &PaymentEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
