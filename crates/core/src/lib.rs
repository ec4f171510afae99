//! Core business logic for campuscare-rs.
//!
//! The services here own the rules governing complaint records, user records,
//! and dashboard statistics. They take and return plain data so any
//! presentation layer can bind to them; no rendering or wire surface lives in
//! this crate.

pub mod services;

pub use services::*;
