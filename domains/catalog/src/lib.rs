//! Catalog domain: supplier products and their unit prices

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::*;
pub use repository::ProductRepository;

pub use api::routes;
pub use api::CatalogState;
