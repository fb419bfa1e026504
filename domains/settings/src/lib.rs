//! Settings domain: tax preferences and terms-of-service files

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository types
pub use repository::{PreferenceRepository, SettingsRepositories, TermsOfServiceRepository};

// Re-export API types
pub use api::routes;
pub use api::SettingsState;
