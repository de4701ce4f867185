use chrono::NaiveDate;

use crate::budgets::Budget;
use crate::errors::Result;
use crate::spending::spending_model::{BudgetSpending, BudgetSpendingDetail};

/// Trait defining the contract for the spending aggregator
pub trait SpendingServiceTrait: Send + Sync {
    /// Computes per-period spend for every active budget in `budgets`.
    /// Returns a full, consistent set or an error - never a partial one.
    fn summarize(
        &self,
        user_id: &str,
        budgets: &[Budget],
        as_of: NaiveDate,
    ) -> Result<Vec<BudgetSpending>>;

    /// Computes one budget's spending plus the ledger entries behind it.
    fn summarize_budget(
        &self,
        user_id: &str,
        budget: &Budget,
        as_of: NaiveDate,
    ) -> Result<BudgetSpendingDetail>;
}
