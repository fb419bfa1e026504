//! Repository implementations for Catalog domain

pub mod products;

pub use products::ProductRepository;
