//! Catalog domain state and auth backend integration

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;
use foodhub_common::CurrencyConfig;

use crate::ProductRepository;

/// Application state for the Catalog domain
#[derive(Clone)]
pub struct CatalogState {
    pub products: ProductRepository,
    pub auth: AuthBackend,
    pub currency: CurrencyConfig,
}

impl FromRef<CatalogState> for AuthBackend {
    fn from_ref(state: &CatalogState) -> Self {
        state.auth.clone()
    }
}
