//! HTTP handlers for the Catalog domain

pub mod products;
