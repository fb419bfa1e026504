//! HTTP handlers for the Enterprises domain

pub mod enterprises;
pub mod groups;
pub mod managers;
