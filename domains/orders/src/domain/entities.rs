//! Orders domain entities
//!
//! Money columns are integer cents. Totals are recomputed whenever line
//! items or the voucher adjustment change.

use chrono::{DateTime, Utc};
use foodhub_common::{decimal_to_cents, Error, Result};
use foodhub_vouchers::Voucher;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{OrderState, PaymentState, ShipmentState};

/// Generate an order number: `R` followed by nine digits.
pub fn generate_order_number() -> String {
    format!("R{:09}", rand::thread_rng().gen_range(0..1_000_000_000u32))
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid offline; captured by the shop
    Check,
    /// Card payment through the payment gateway
    Gateway,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Gateway => write!(f, "gateway"),
        }
    }
}

/// Summary of an order's payments against its total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderPaymentState {
    BalanceDue,
    Paid,
    CreditOwed,
    Failed,
    Void,
}

impl OrderPaymentState {
    /// Derive the payment state of an order from its payments.
    ///
    /// `None` for carts that have never been checked out.
    pub fn derive(order_state: OrderState, total_cents: i64, payments: &[Payment]) -> Option<Self> {
        let paid = completed_total(payments);

        if order_state == OrderState::Canceled {
            return Some(if paid > 0 { Self::CreditOwed } else { Self::Void });
        }
        if payments.is_empty() {
            return (order_state != OrderState::Cart).then_some(Self::BalanceDue);
        }
        if paid > total_cents {
            return Some(Self::CreditOwed);
        }
        if paid == total_cents {
            return Some(Self::Paid);
        }
        match payments.last() {
            Some(latest) if latest.state == PaymentState::Failed => Some(Self::Failed),
            _ => Some(Self::BalanceDue),
        }
    }
}

impl std::fmt::Display for OrderPaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BalanceDue => write!(f, "balance_due"),
            Self::Paid => write!(f, "paid"),
            Self::CreditOwed => write!(f, "credit_owed"),
            Self::Failed => write!(f, "failed"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Sum of completed payment amounts
pub fn completed_total(payments: &[Payment]) -> i64 {
    payments
        .iter()
        .filter(|p| p.state == PaymentState::Completed)
        .map(|p| p.amount_cents)
        .sum()
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub number: String,
    pub distributor_id: Uuid,
    pub created_by: Option<Uuid>,
    pub email: String,
    pub state: OrderState,
    pub shipment_state: ShipmentState,
    pub payment_state: Option<OrderPaymentState>,
    pub item_total_cents: i64,
    pub voucher_code: Option<String>,
    pub voucher_discount_cents: i64,
    pub total_cents: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New cart order for `distributor_id` with the given line items.
    pub fn new(
        distributor_id: Uuid,
        created_by: Option<Uuid>,
        email: &str,
        line_items: &[LineItem],
    ) -> Result<Self> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("Email is invalid".to_string()));
        }

        let now = Utc::now();
        let mut order = Self {
            id: Uuid::new_v4(),
            number: generate_order_number(),
            distributor_id,
            created_by,
            email,
            state: OrderState::Cart,
            shipment_state: ShipmentState::Pending,
            payment_state: None,
            item_total_cents: 0,
            voucher_code: None,
            voucher_discount_cents: 0,
            total_cents: 0,
            completed_at: None,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        };
        order.recalculate(line_items, None)?;
        Ok(order)
    }

    /// Recompute totals from the line items and the applied voucher.
    pub fn recalculate(&mut self, line_items: &[LineItem], voucher: Option<&Voucher>) -> Result<()> {
        self.item_total_cents = line_items
            .iter()
            .try_fold(0i64, |total, item| {
                item.checked_amount_cents()
                    .and_then(|amount| total.checked_add(amount))
            })
            .ok_or_else(amount_out_of_range)?;
        self.voucher_code = voucher.map(|v| v.code.clone());
        self.voucher_discount_cents = voucher.map_or(0, |v| v.discount_cents(self.item_total_cents));
        self.total_cents = self.item_total_cents - self.voucher_discount_cents;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move to `next`, keeping the shipment state and timestamps in step.
    pub fn apply_state(&mut self, next: OrderState) {
        let now = Utc::now();
        self.state = next;
        self.shipment_state = ShipmentState::for_order(next);
        match next {
            OrderState::Complete if self.completed_at.is_none() => self.completed_at = Some(now),
            OrderState::Canceled => self.canceled_at = Some(now),
            _ => {}
        }
        self.updated_at = now;
    }

    /// Refresh the derived payment state.
    pub fn refresh_payment_state(&mut self, payments: &[Payment]) {
        self.payment_state = OrderPaymentState::derive(self.state, self.total_cents, payments);
    }

    /// Completed payments cover the total
    pub fn is_paid(&self, payments: &[Payment]) -> bool {
        completed_total(payments) >= self.total_cents
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Quantity times unit price. Stored items never overflow.
    pub fn amount_cents(&self) -> i64 {
        self.checked_amount_cents().unwrap_or(i64::MAX)
    }

    fn checked_amount_cents(&self) -> Option<i64> {
        self.quantity.checked_mul(self.price_cents)
    }
}

fn amount_out_of_range() -> Error {
    Error::Validation("Amount is out of range".to_string())
}

/// Line item as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct NewLineItem {
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
}

impl NewLineItem {
    pub fn into_line_item(self, order_id: Uuid) -> Result<LineItem> {
        let name = self.name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Line item name can't be blank");
        }
        if self.quantity <= 0 {
            errors.push("Quantity must be greater than 0");
        }
        if self.price < Decimal::ZERO {
            errors.push("Price must be greater than or equal to 0");
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        let item = LineItem {
            id: Uuid::new_v4(),
            order_id,
            name: name.to_string(),
            quantity: self.quantity,
            price_cents: decimal_to_cents(self.price)?,
            created_at: Utc::now(),
        };
        item.checked_amount_cents().ok_or_else(amount_out_of_range)?;
        Ok(item)
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    pub state: PaymentState,
    pub amount_cents: i64,
    /// Gateway reference (payment intent id)
    pub response_code: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(order_id: Uuid, payment_method: PaymentMethod, amount_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_id,
            payment_method,
            state: PaymentState::Checkout,
            amount_cents,
            response_code: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_state(&mut self, state: PaymentState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}
