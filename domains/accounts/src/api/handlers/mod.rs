//! HTTP handlers for the Accounts domain

pub mod account;
pub mod sessions;
pub mod users;
