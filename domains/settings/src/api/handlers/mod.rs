//! HTTP handlers for the Settings domain

pub mod tax_settings;
pub mod terms_of_service;
