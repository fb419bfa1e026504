//! Back-office API integration tests
//!
//! Each test builds the full application on a fresh in-memory database
//! and drives it in-process, carrying the session cookie like a browser.

#![allow(dead_code)]

mod catalog;
mod common;
mod enterprise_groups;
mod enterprises;
mod locale;
mod orders;
mod payments;
mod sessions;
mod settings;
mod users;
mod vouchers;
