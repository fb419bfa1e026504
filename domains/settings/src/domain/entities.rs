//! Domain entities for system-wide settings
//!
//! Tax settings are stored as individual preference rows and assembled
//! here; missing rows fall back to the defaults.

use chrono::{DateTime, Utc};
use foodhub_common::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PRODUCTS_REQUIRE_TAX_CATEGORY: &str = "products_require_tax_category";
pub const SHIPPING_TAX_RATE: &str = "shipping_tax_rate";
pub const DISPLAY_TAX_BREAKDOWN_ON_INVOICES: &str = "display_tax_breakdown_on_invoices";

/// Instance-wide tax configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxSettings {
    pub products_require_tax_category: bool,
    /// Percentage, 0 to 100
    pub shipping_tax_rate: Decimal,
    pub display_tax_breakdown_on_invoices: bool,
}

impl TaxSettings {
    pub fn validate(&self) -> Result<()> {
        if self.shipping_tax_rate < Decimal::ZERO || self.shipping_tax_rate > Decimal::ONE_HUNDRED
        {
            return Err(Error::Validation(
                "Shipping tax rate must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Key/value pairs as persisted in the preferences table
    pub fn to_preferences(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                PRODUCTS_REQUIRE_TAX_CATEGORY,
                self.products_require_tax_category.to_string(),
            ),
            (SHIPPING_TAX_RATE, self.shipping_tax_rate.normalize().to_string()),
            (
                DISPLAY_TAX_BREAKDOWN_ON_INVOICES,
                self.display_tax_breakdown_on_invoices.to_string(),
            ),
        ]
    }

    /// Rebuild from stored preferences. Unknown keys are ignored and
    /// unparseable values keep their default.
    pub fn from_preferences<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Self::default();
        for (key, value) in rows {
            match key {
                PRODUCTS_REQUIRE_TAX_CATEGORY => {
                    settings.products_require_tax_category = value == "true";
                }
                SHIPPING_TAX_RATE => {
                    if let Ok(rate) = value.parse() {
                        settings.shipping_tax_rate = rate;
                    }
                }
                DISPLAY_TAX_BREAKDOWN_ON_INVOICES => {
                    settings.display_tax_breakdown_on_invoices = value == "true";
                }
                _ => {}
            }
        }
        settings
    }
}

/// Uploaded terms-of-service document (metadata only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TermsOfServiceFile {
    pub id: Uuid,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TermsOfServiceFile {
    pub fn new(filename: String) -> Result<Self> {
        let filename = filename.trim().to_string();
        if filename.is_empty() {
            return Err(Error::Validation("Filename can't be blank".to_string()));
        }
        if !filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(Error::Validation(
                "Terms of service file must be a PDF".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            filename,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Whether a user still has to accept the current terms of service.
pub fn banner_required(
    current: Option<&TermsOfServiceFile>,
    accepted_at: Option<DateTime<Utc>>,
) -> bool {
    match (current, accepted_at) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(file), Some(accepted)) => accepted < file.updated_at,
    }
}
