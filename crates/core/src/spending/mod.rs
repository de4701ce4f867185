//! Spending module - per-period budget aggregation.

mod spending_model;
mod spending_service;
mod spending_traits;

pub use spending_model::{BudgetHealth, BudgetSpending, BudgetSpendingDetail};
pub use spending_service::SpendingService;
pub use spending_traits::SpendingServiceTrait;
