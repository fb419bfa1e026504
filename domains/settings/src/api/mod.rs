//! API layer for the Settings domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::SettingsState;
pub use routes::routes;
