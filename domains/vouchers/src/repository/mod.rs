//! Repository implementations for Vouchers domain

pub mod vouchers;

pub use vouchers::VoucherRepository;
