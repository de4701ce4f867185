//! Ledger module - transaction models and the ledger store trait.

mod ledger_model;
mod ledger_traits;

pub use ledger_model::{LedgerEntry, NewLedgerEntry};
pub use ledger_traits::LedgerRepositoryTrait;
