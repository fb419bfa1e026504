//! Settings domain state and auth backend integration

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;

use crate::SettingsRepositories;

/// Application state for the Settings domain
#[derive(Clone)]
pub struct SettingsState {
    pub repos: SettingsRepositories,
    pub auth: AuthBackend,
}

impl FromRef<SettingsState> for AuthBackend {
    fn from_ref(state: &SettingsState) -> Self {
        state.auth.clone()
    }
}
