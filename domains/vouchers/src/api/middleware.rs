//! Vouchers domain state and auth backend integration

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;

use crate::VoucherRepository;

/// Application state for the Vouchers domain
#[derive(Clone)]
pub struct VouchersState {
    pub vouchers: VoucherRepository,
    pub auth: AuthBackend,
}

impl FromRef<VouchersState> for AuthBackend {
    fn from_ref(state: &VouchersState) -> Self {
        state.auth.clone()
    }
}
