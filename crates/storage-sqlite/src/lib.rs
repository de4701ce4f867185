//! SQLite storage layer for spendguard.
//!
//! Implements the repository traits defined by `spendguard-core` on top of
//! Diesel and a WAL-mode SQLite database. All writes are funneled through a
//! single writer actor; reads use the connection pool directly.

pub mod alerts;
pub mod automations;
pub mod budgets;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod schema;
pub mod utils;

pub use errors::StorageError;
