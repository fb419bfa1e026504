//! Enterprises domain state and auth backend integration

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;

use crate::EnterprisesRepositories;

/// Application state for the Enterprises domain
#[derive(Clone)]
pub struct EnterprisesState {
    pub repos: EnterprisesRepositories,
    pub auth: AuthBackend,
}

impl FromRef<EnterprisesState> for AuthBackend {
    fn from_ref(state: &EnterprisesState) -> Self {
        state.auth.clone()
    }
}
