//! HTTP handlers for the Orders domain

pub mod cancellation;
pub mod checkout;
pub mod orders;
pub mod payments;
