//! API layer for the Enterprises domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::EnterprisesState;
pub use routes::routes;
