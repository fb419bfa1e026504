//! Domain layer for the Vouchers domain

pub mod entities;
