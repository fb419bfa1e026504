//! Domain layer for the Settings domain

pub mod entities;
