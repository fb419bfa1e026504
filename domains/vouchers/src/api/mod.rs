//! API layer for the Vouchers domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::VouchersState;
pub use routes::routes;
