//! Catalog domain entities
//!
//! A product is sold in a fixed quantity (`unit_value`) measured in its
//! variant unit. Unit prices normalise the price to one kilogram, pound,
//! litre or item so shoppers can compare.

use chrono::{DateTime, Utc};
use foodhub_common::{
    cents_to_decimal, decimal_to_cents, round_to_cents, CurrencyConfig, Error, Result,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grams in a pound
const GRAMS_PER_POUND: Decimal = Decimal::from_parts(4536, 0, 0, false, 1);
/// Unit scales displayed in imperial weights (lb, oz)
const IMPERIAL_WEIGHT_SCALES: [f64; 2] = [453.6, 28.35];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VariantUnit {
    Weight,
    Volume,
    Items,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
    pub variant_unit: VariantUnit,
    /// Display scale of weight/volume units, e.g. 1000 for kg, 453.6 for lb
    pub variant_unit_scale: Option<f64>,
    /// Name of one item for `items` products, e.g. "bunch"
    pub variant_unit_name: Option<String>,
    /// Grams for weight, litres for volume, count for items
    pub unit_value: f64,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Price of one display unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitPrice {
    pub amount: Decimal,
    pub unit: String,
}

impl UnitPrice {
    /// e.g. `$3.20 / kg`
    pub fn display(&self, currency: &CurrencyConfig) -> String {
        format!("{} / {}", currency.format(self.amount), self.unit)
    }
}

/// Fields accepted when creating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub supplier_id: Uuid,
    pub name: String,
    pub variant_unit: VariantUnit,
    pub variant_unit_scale: Option<f64>,
    pub variant_unit_name: Option<String>,
    pub unit_value: f64,
    pub price: Decimal,
}

impl Product {
    pub fn new(input: NewProduct) -> Result<Self> {
        let name = input.name.trim();
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push("Name can't be blank");
        }
        if !input.unit_value.is_finite() || input.unit_value <= 0.0 {
            errors.push("Unit value must be greater than 0");
        }
        if input.price < Decimal::ZERO {
            errors.push("Price must be greater than or equal to 0");
        }
        if matches!(input.variant_unit_scale, Some(s) if !s.is_finite() || s <= 0.0) {
            errors.push("Variant unit scale must be greater than 0");
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        let variant_unit_name = input
            .variant_unit_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            supplier_id: input.supplier_id,
            name: name.to_string(),
            variant_unit: input.variant_unit,
            variant_unit_scale: input.variant_unit_scale,
            variant_unit_name,
            unit_value: input.unit_value,
            price_cents: decimal_to_cents(input.price)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn price(&self) -> Decimal {
        cents_to_decimal(self.price_cents)
    }

    fn measured_in_pounds(&self) -> bool {
        self.variant_unit_scale.is_some_and(|scale| {
            IMPERIAL_WEIGHT_SCALES
                .iter()
                .any(|imperial| (scale - imperial).abs() < 1e-6)
        })
    }

    /// Price of one kg/lb, litre, or item. `None` when the quantity is unusable.
    pub fn unit_price(&self) -> Option<UnitPrice> {
        let unit_value = Decimal::from_f64(self.unit_value)?;

        let (quantity, unit) = match self.variant_unit {
            VariantUnit::Weight if self.measured_in_pounds() => {
                (unit_value / GRAMS_PER_POUND, "lb".to_string())
            }
            VariantUnit::Weight => (unit_value / Decimal::ONE_THOUSAND, "kg".to_string()),
            VariantUnit::Volume => (unit_value, "L".to_string()),
            VariantUnit::Items => (
                unit_value,
                self.variant_unit_name
                    .clone()
                    .unwrap_or_else(|| "item".to_string()),
            ),
        };

        if quantity <= Decimal::ZERO {
            return None;
        }
        let mut amount = round_to_cents(self.price().checked_div(quantity)?);
        amount.rescale(2);
        Some(UnitPrice { amount, unit })
    }
}
