use chrono::NaiveDate;

use crate::errors::Result;
use crate::ledger::ledger_model::{LedgerEntry, NewLedgerEntry};
use async_trait::async_trait;

/// Trait for ledger store operations
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Lists the non-pending entries of one user matching a budget's
    /// category (and subcategory, when given) whose posting date falls in
    /// `[from_inclusive, to_exclusive)`.
    fn list_entries_in_window(
        &self,
        user_id: &str,
        category: &str,
        subcategory: Option<&str>,
        from_inclusive: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> Result<Vec<LedgerEntry>>;

    fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<Option<LedgerEntry>>;

    async fn insert_entry(&self, user_id: &str, new_entry: NewLedgerEntry) -> Result<LedgerEntry>;
}
