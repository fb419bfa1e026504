//! Tax settings API handlers
//!
//! System-wide configuration: only admins may read or change it, whatever
//! enterprises they own.

use axum::{extract::State, Json};
use foodhub_auth::SuperAdmin;
use foodhub_common::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::middleware::SettingsState;
use crate::TaxSettings;

/// Partial update of the tax settings; omitted fields keep their value
#[derive(Debug, Deserialize)]
pub struct UpdateTaxSettingsRequest {
    pub products_require_tax_category: Option<bool>,
    pub shipping_tax_rate: Option<Decimal>,
    pub display_tax_breakdown_on_invoices: Option<bool>,
}

impl UpdateTaxSettingsRequest {
    fn apply(self, mut settings: TaxSettings) -> TaxSettings {
        if let Some(value) = self.products_require_tax_category {
            settings.products_require_tax_category = value;
        }
        if let Some(value) = self.shipping_tax_rate {
            settings.shipping_tax_rate = value;
        }
        if let Some(value) = self.display_tax_breakdown_on_invoices {
            settings.display_tax_breakdown_on_invoices = value;
        }
        settings
    }
}

/// **GET /admin/tax_settings**
pub async fn get_tax_settings(
    SuperAdmin(_ctx): SuperAdmin,
    State(state): State<SettingsState>,
) -> Result<Json<TaxSettings>> {
    let settings = state.repos.preferences.tax_settings().await?;
    Ok(Json(settings))
}

/// **PUT /admin/tax_settings**
///
/// Validates the merged settings before anything is written.
pub async fn update_tax_settings(
    SuperAdmin(ctx): SuperAdmin,
    State(state): State<SettingsState>,
    Json(request): Json<UpdateTaxSettingsRequest>,
) -> Result<Json<TaxSettings>> {
    let current = state.repos.preferences.tax_settings().await?;
    let updated = request.apply(current);
    updated.validate()?;

    let saved = state
        .repos
        .preferences
        .save_tax_settings(&updated)
        .await
        .map_err(|e| Error::Internal(format!("Failed to save tax settings: {}", e)))?;

    tracing::info!(user_id = %ctx.user.id, "Tax settings updated");
    Ok(Json(saved))
}
