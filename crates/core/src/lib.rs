//! Spendguard Core - Domain entities, services, and traits.
//!
//! This crate contains the budget accounting and rule evaluation logic
//! for spendguard. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod alerts;
pub mod automations;
pub mod budgets;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod spending;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
