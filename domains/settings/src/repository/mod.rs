//! Repository implementations for Settings domain

pub mod preferences;
pub mod terms_of_service;

use foodhub_common::DbPool;

pub use preferences::PreferenceRepository;
pub use terms_of_service::TermsOfServiceRepository;

/// Combined repository access for the Settings domain
#[derive(Clone)]
pub struct SettingsRepositories {
    pub preferences: PreferenceRepository,
    pub terms: TermsOfServiceRepository,
}

impl SettingsRepositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            preferences: PreferenceRepository::new(pool.clone()),
            terms: TermsOfServiceRepository::new(pool),
        }
    }
}
