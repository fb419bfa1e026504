//! Route definitions for Settings domain API

use axum::{routing::get, Router};

use super::handlers::{tax_settings, terms_of_service};
use super::middleware::SettingsState;

/// Create tax settings routes
fn tax_settings_routes() -> Router<SettingsState> {
    Router::new().route(
        "/admin/tax_settings",
        get(tax_settings::get_tax_settings).put(tax_settings::update_tax_settings),
    )
}

/// Create terms-of-service routes
fn terms_of_service_routes() -> Router<SettingsState> {
    Router::new()
        .route(
            "/admin/terms_of_service_files",
            get(terms_of_service::get_current_file).post(terms_of_service::create_file),
        )
        .route("/terms_of_service", get(terms_of_service::show_public))
}

/// Create all Settings domain API routes
pub fn routes() -> Router<SettingsState> {
    Router::new()
        .merge(tax_settings_routes())
        .merge(terms_of_service_routes())
}
