//! Repository implementations for Enterprises domain

pub mod enterprises;
pub mod groups;
pub mod transactions;

use foodhub_common::DbPool;

pub use enterprises::EnterpriseRepository;
pub use groups::EnterpriseGroupRepository;
pub use transactions::{next_group_position_tx, replace_group_members_tx, swap_group_positions_tx};

/// Combined repository access for the Enterprises domain
#[derive(Clone)]
pub struct EnterprisesRepositories {
    pub enterprises: EnterpriseRepository,
    pub groups: EnterpriseGroupRepository,
}

impl EnterprisesRepositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            enterprises: EnterpriseRepository::new(pool.clone()),
            groups: EnterpriseGroupRepository::new(pool),
        }
    }
}
