use chrono::{DateTime, NaiveDate, Utc};

use crate::alerts::alerts_model::{Alert, AlertStatus, BudgetCheckSummary, NewAlert};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for alert store operations
#[async_trait]
pub trait AlertRepositoryTrait: Send + Sync {
    fn list_alerts(&self, user_id: &str, status: Option<AlertStatus>) -> Result<Vec<Alert>>;

    fn get_alert(&self, user_id: &str, alert_id: &str) -> Result<Option<Alert>>;

    /// Conditionally inserts an alert; returns `false` when an unresolved
    /// alert already exists for the same `(budget_id, period_start)` key.
    ///
    /// Implementations MUST enforce this atomically at the storage layer
    /// (unique index + conflict-ignoring insert), never with a separate
    /// existence check, so concurrent invocations cannot both insert.
    async fn create_if_absent(&self, new_alert: NewAlert) -> Result<bool>;

    async fn set_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Alert>;
}

/// Trait for alert service operations
#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    fn list_alerts(&self, user_id: &str, status: Option<AlertStatus>) -> Result<Vec<Alert>>;

    /// Evaluates all of the user's active budgets as of `as_of` and raises
    /// an alert for each newly exceeded period. Safe to call repeatedly.
    async fn check_budgets(&self, user_id: &str, as_of: NaiveDate) -> Result<BudgetCheckSummary>;

    async fn acknowledge(&self, user_id: &str, alert_id: &str) -> Result<Alert>;

    async fn resolve(&self, user_id: &str, alert_id: &str) -> Result<Alert>;
}
