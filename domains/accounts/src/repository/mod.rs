//! Repository implementations for Accounts domain

pub mod users;

use foodhub_common::DbPool;

pub use users::UserRepository;

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pub users: UserRepository,
}

impl AccountsRepositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }
}
