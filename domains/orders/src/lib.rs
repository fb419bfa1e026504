//! Orders domain: order lifecycle, payments and cancellation

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::*;

// Re-export repository types
pub use repository::{OrderRepository, OrdersRepositories, PaymentRepository};

// Re-export API types
pub use api::routes;
pub use api::OrdersState;
