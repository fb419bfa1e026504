//! Money helpers
//!
//! Amounts are persisted as integer cents and handled as `Decimal` in
//! domain logic. Display rounds half away from zero to two places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where the currency symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

/// Instance-wide currency display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub thousands_separator: String,
    pub decimal_mark: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            symbol_position: SymbolPosition::Before,
            thousands_separator: ",".to_string(),
            decimal_mark: ".".to_string(),
        }
    }
}

impl CurrencyConfig {
    /// Format an amount, e.g. `$1,500.00` or `1.500,00 $`.
    pub fn format(&self, amount: Decimal) -> String {
        let mut rounded = round_to_cents(amount);
        rounded.rescale(2);

        let digits = rounded.abs().to_string();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let number = format!(
            "{}{}{}",
            group_thousands(whole, &self.thousands_separator),
            self.decimal_mark,
            fraction
        );
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        match self.symbol_position {
            SymbolPosition::Before => format!("{}{}{}", sign, self.symbol, number),
            SymbolPosition::After => format!("{}{} {}", sign, number, self.symbol),
        }
    }
}

fn group_thousands(whole: &str, separator: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn decimal_to_cents(amount: Decimal) -> Result<i64> {
    (round_to_cents(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| Error::Validation(format!("Amount {} is out of range", amount)))
}
