//! Orders domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use foodhub_auth::AuthBackend;
use foodhub_common::CurrencyConfig;
use foodhub_email::EmailService;
use foodhub_payments::PaymentGateway;
use foodhub_vouchers::VoucherRepository;

use crate::OrdersRepositories;

/// Application state for the Orders domain
#[derive(Clone)]
pub struct OrdersState {
    pub repos: OrdersRepositories,
    pub vouchers: VoucherRepository,
    pub auth: AuthBackend,
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailService>,
    pub currency: CurrencyConfig,
}

impl FromRef<OrdersState> for AuthBackend {
    fn from_ref(state: &OrdersState) -> Self {
        state.auth.clone()
    }
}
