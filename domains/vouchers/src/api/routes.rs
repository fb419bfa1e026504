//! Route definitions for Vouchers domain API

use axum::{routing::get, Router};

use super::handlers;
use super::middleware::VouchersState;

/// Create all Vouchers domain API routes
pub fn routes() -> Router<VouchersState> {
    Router::new()
        .route(
            "/admin/enterprises/{id}/vouchers",
            get(handlers::list_vouchers).post(handlers::create_voucher),
        )
        .route(
            "/admin/enterprises/{id}/vouchers/{code}",
            get(handlers::get_voucher).delete(handlers::delete_voucher),
        )
}
