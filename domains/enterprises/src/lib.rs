//! Enterprises domain: enterprises, managers, enterprise groups

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
// Re-export repository types
pub use repository::{
    next_group_position_tx, replace_group_members_tx, swap_group_positions_tx,
    EnterpriseGroupRepository, EnterpriseRepository, EnterprisesRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::EnterprisesState;
