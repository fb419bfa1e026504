//! Accounts domain state and auth backend integration

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;
use foodhub_settings::TermsOfServiceRepository;

use crate::AccountsRepositories;

/// Application state for the Accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub repos: AccountsRepositories,
    /// Current terms of service, for the dashboard banner
    pub terms: TermsOfServiceRepository,
    pub auth: AuthBackend,
    pub default_enterprise_limit: i64,
}

impl FromRef<AccountsState> for AuthBackend {
    fn from_ref(state: &AccountsState) -> Self {
        state.auth.clone()
    }
}
