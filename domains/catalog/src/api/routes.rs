//! Route definitions for Catalog domain API

use axum::{routing::get, Router};

use super::handlers::products;
use super::middleware::CatalogState;

/// Create all Catalog domain API routes
pub fn routes() -> Router<CatalogState> {
    Router::new()
        .route(
            "/admin/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/admin/products/{id}", get(products::get_product))
}
