//! API layer for the Catalog domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CatalogState;
pub use routes::routes;
