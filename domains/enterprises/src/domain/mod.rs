//! Domain layer for the Enterprises domain

pub mod entities;
