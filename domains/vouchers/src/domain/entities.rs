//! Voucher entity and discount computation
//!
//! Amounts are stored in hundredths: cents for flat vouchers, hundredths of
//! a percent for percentage vouchers.

use chrono::{DateTime, Utc};
use foodhub_common::{cents_to_decimal, decimal_to_cents, Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    #[default]
    Flat,
    Percentage,
}

impl std::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoucherType::Flat => write!(f, "flat"),
            VoucherType::Percentage => write!(f, "percentage"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Voucher {
    pub id: Uuid,
    pub enterprise_id: Uuid,
    pub code: String,
    pub voucher_type: VoucherType,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    /// Validate and build a voucher, reporting every problem at once.
    pub fn new(
        enterprise_id: Uuid,
        code: &str,
        voucher_type: VoucherType,
        amount: Decimal,
    ) -> Result<Self> {
        let code = code.trim();
        let mut errors = Vec::new();

        if code.is_empty() {
            errors.push("Code can't be blank".to_string());
        }
        if amount <= Decimal::ZERO {
            errors.push("Amount must be greater than 0".to_string());
        } else if voucher_type == VoucherType::Percentage && amount > Decimal::ONE_HUNDRED {
            errors.push("Amount must be less than or equal to 100".to_string());
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        let amount_cents = decimal_to_cents(amount)?;
        if amount_cents == 0 {
            return Err(Error::Validation("Amount must be greater than 0".to_string()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            enterprise_id,
            code: code.to_string(),
            voucher_type,
            amount_cents,
            created_at: Utc::now(),
        })
    }

    /// Face value: money for flat vouchers, percent for percentage ones
    pub fn amount(&self) -> Decimal {
        cents_to_decimal(self.amount_cents)
    }

    /// Discount in cents for an order whose items total `item_total_cents`.
    ///
    /// Never more than the item total.
    pub fn discount_cents(&self, item_total_cents: i64) -> i64 {
        let item_total_cents = item_total_cents.max(0);
        let discount = match self.voucher_type {
            VoucherType::Flat => self.amount_cents,
            VoucherType::Percentage => (Decimal::from(item_total_cents)
                * Decimal::from(self.amount_cents)
                / Decimal::from(10_000))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(item_total_cents),
        };
        discount.min(item_total_cents)
    }
}
