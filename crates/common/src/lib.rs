//! Shared utilities, configuration, and error handling for FoodHub
//!
//! This crate provides common functionality used across the back-office:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - SQLite pool setup and embedded migrations
//! - Password and session token hashing
//! - Locale negotiation and currency formatting

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod locale;
pub mod money;
pub mod state;

pub use config::{Config, LogFormat};
pub use crypto::{generate_token, hash_password, token_digest, verify_password};
pub use db::{is_foreign_key_violation, is_unique_violation, DbPool};
pub use error::{Error, Result};
pub use extractors::{validation_message, Pagination, ValidatedJson};
pub use locale::LocaleConfig;
pub use money::{
    cents_to_decimal, decimal_to_cents, round_to_cents, CurrencyConfig, SymbolPosition,
};
pub use state::StateError;
