//! Route definitions for Orders domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{cancellation, checkout, orders, payments};
use super::middleware::OrdersState;

/// Create order routes
fn order_routes() -> Router<OrdersState> {
    Router::new()
        .route(
            "/admin/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/admin/orders/{id}", get(orders::get_order))
        .route("/admin/orders/{id}/line_items", post(orders::add_line_item))
        .route("/admin/orders/{id}/voucher", post(orders::apply_voucher))
        .route("/admin/orders/{id}/resume", post(orders::resume_order))
}

/// Create checkout and payment routes
fn payment_routes() -> Router<OrdersState> {
    Router::new()
        .route("/admin/orders/{id}/checkout", post(checkout::checkout))
        .route(
            "/admin/orders/{id}/payments",
            get(payments::list_payments).post(checkout::add_payment),
        )
        .route(
            "/admin/orders/{id}/payments/{payment_id}/capture",
            post(payments::capture_payment),
        )
        .route(
            "/admin/orders/{id}/payments/{payment_id}/void",
            post(payments::void_payment),
        )
}

/// Create cancellation routes
fn cancellation_routes() -> Router<OrdersState> {
    Router::new()
        .route("/admin/orders/{id}/cancel", post(cancellation::cancel_order))
        .route("/admin/orders/bulk_cancel", post(cancellation::bulk_cancel))
}

/// Create all Orders domain API routes
pub fn routes() -> Router<OrdersState> {
    Router::new()
        .merge(order_routes())
        .merge(payment_routes())
        .merge(cancellation_routes())
}
