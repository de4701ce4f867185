use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::error;
use rust_decimal::Decimal;

use crate::alerts::alerts_model::{
    Alert, AlertKind, AlertSeverity, AlertStatus, BudgetCheckSummary, NewAlert,
};
use crate::alerts::alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
use crate::budgets::BudgetRepositoryTrait;
use crate::constants::CRITICAL_THRESHOLD_PERCENT;
use crate::errors::{Error, Result};
use crate::spending::{BudgetSpending, SpendingServiceTrait};

pub struct AlertService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    spending_service: Arc<dyn SpendingServiceTrait>,
    alert_repository: Arc<dyn AlertRepositoryTrait>,
}

impl AlertService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        spending_service: Arc<dyn SpendingServiceTrait>,
        alert_repository: Arc<dyn AlertRepositoryTrait>,
    ) -> Self {
        AlertService {
            budget_repository,
            spending_service,
            alert_repository,
        }
    }

    fn build_alert(user_id: &str, row: &BudgetSpending) -> NewAlert {
        let severity = if row.percentage >= Decimal::from(CRITICAL_THRESHOLD_PERCENT) {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warn
        };
        NewAlert {
            user_id: user_id.to_string(),
            kind: AlertKind::Budget,
            budget_id: Some(row.budget_id.clone()),
            period_start: Some(row.period_start),
            severity,
            title: format!("Budget exceeded: {}", row.category),
            message: Some(format!(
                "Spent {} of {} {} for the period starting {}",
                row.spent, row.cap_amount_effective, row.currency, row.period_start
            )),
        }
    }

    async fn transition(
        &self,
        user_id: &str,
        alert_id: &str,
        requested: AlertStatus,
    ) -> Result<Alert> {
        let alert = self
            .alert_repository
            .get_alert(user_id, alert_id)?
            .ok_or_else(|| Error::NotFound(format!("alert {alert_id}")))?;

        let next = alert.status.apply(requested);
        if next == alert.status {
            // Idempotent transition, nothing to persist.
            return Ok(alert);
        }
        let resolved_at = (next == AlertStatus::Resolved).then(Utc::now);
        self.alert_repository
            .set_status(alert_id, next, resolved_at)
            .await
    }
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    fn list_alerts(&self, user_id: &str, status: Option<AlertStatus>) -> Result<Vec<Alert>> {
        self.alert_repository.list_alerts(user_id, status)
    }

    async fn check_budgets(&self, user_id: &str, as_of: NaiveDate) -> Result<BudgetCheckSummary> {
        let budgets = self.budget_repository.list_active_budgets(user_id)?;
        // Aggregation failures abort the whole check; persistence failures
        // below are isolated per budget.
        let rows = self.spending_service.summarize(user_id, &budgets, as_of)?;

        let mut alerts_created = 0u32;
        for row in rows.iter().filter(|r| r.is_exceeded) {
            let new_alert = Self::build_alert(user_id, row);
            match self.alert_repository.create_if_absent(new_alert).await {
                Ok(true) => alerts_created += 1,
                Ok(false) => {
                    // Already raised for this period, possibly by a
                    // concurrent invocation.
                }
                Err(err) => {
                    error!(
                        "failed to persist budget alert for {} ({}): {err}",
                        row.budget_id, row.period_start
                    );
                }
            }
        }
        Ok(BudgetCheckSummary { alerts_created })
    }

    async fn acknowledge(&self, user_id: &str, alert_id: &str) -> Result<Alert> {
        self.transition(user_id, alert_id, AlertStatus::Acknowledged)
            .await
    }

    async fn resolve(&self, user_id: &str, alert_id: &str) -> Result<Alert> {
        self.transition(user_id, alert_id, AlertStatus::Resolved)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budgets::{Budget, BudgetUpdate, NewBudget, PeriodUnit};
    use crate::errors::DatabaseError;
    use crate::spending::{BudgetHealth, BudgetSpendingDetail};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::RwLock;

    struct MockBudgetRepository {
        budgets: Vec<Budget>,
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn list_budgets(&self, _user_id: &str) -> Result<Vec<Budget>> {
            Ok(self.budgets.clone())
        }

        fn list_active_budgets(&self, _user_id: &str) -> Result<Vec<Budget>> {
            Ok(self.budgets.iter().filter(|b| b.is_active).cloned().collect())
        }

        fn get_budget(&self, _user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
            Ok(self.budgets.iter().find(|b| b.id == budget_id).cloned())
        }

        fn find_active_duplicate(
            &self,
            _user_id: &str,
            _category: &str,
            _subcategory: Option<&str>,
        ) -> Result<Option<Budget>> {
            Ok(None)
        }

        async fn create_budget(&self, _user_id: &str, _new_budget: NewBudget) -> Result<Budget> {
            Err(Error::Unexpected("read-only mock".to_string()))
        }

        async fn update_budget(
            &self,
            _user_id: &str,
            _budget_id: &str,
            _update: BudgetUpdate,
        ) -> Result<Budget> {
            Err(Error::Unexpected("read-only mock".to_string()))
        }
    }

    struct MockSpendingService {
        rows: Vec<BudgetSpending>,
        fail: bool,
    }

    impl SpendingServiceTrait for MockSpendingService {
        fn summarize(
            &self,
            _user_id: &str,
            _budgets: &[Budget],
            _as_of: NaiveDate,
        ) -> Result<Vec<BudgetSpending>> {
            if self.fail {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "ledger store unavailable".to_string(),
                )));
            }
            Ok(self.rows.clone())
        }

        fn summarize_budget(
            &self,
            _user_id: &str,
            _budget: &Budget,
            _as_of: NaiveDate,
        ) -> Result<BudgetSpendingDetail> {
            Err(Error::Unexpected("not used".to_string()))
        }
    }

    /// Alert store mock keyed exactly like the real partial unique index.
    struct MockAlertRepository {
        open_keys: RwLock<HashSet<(String, NaiveDate)>>,
        alerts: RwLock<Vec<Alert>>,
        fail_for_budget: Option<String>,
    }

    impl MockAlertRepository {
        fn new() -> Self {
            Self {
                open_keys: RwLock::new(HashSet::new()),
                alerts: RwLock::new(Vec::new()),
                fail_for_budget: None,
            }
        }

        fn failing_for(budget_id: &str) -> Self {
            Self {
                fail_for_budget: Some(budget_id.to_string()),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl AlertRepositoryTrait for MockAlertRepository {
        fn list_alerts(&self, user_id: &str, status: Option<AlertStatus>) -> Result<Vec<Alert>> {
            Ok(self
                .alerts
                .read()
                .unwrap()
                .iter()
                .filter(|a| a.user_id == user_id && status.is_none_or(|s| a.status == s))
                .cloned()
                .collect())
        }

        fn get_alert(&self, user_id: &str, alert_id: &str) -> Result<Option<Alert>> {
            Ok(self
                .alerts
                .read()
                .unwrap()
                .iter()
                .find(|a| a.user_id == user_id && a.id == alert_id)
                .cloned())
        }

        async fn create_if_absent(&self, new_alert: NewAlert) -> Result<bool> {
            if let (Some(fail_id), Some(budget_id)) =
                (&self.fail_for_budget, &new_alert.budget_id)
            {
                if fail_id == budget_id {
                    return Err(Error::Database(DatabaseError::QueryFailed(
                        "disk full".to_string(),
                    )));
                }
            }
            let key = (
                new_alert.budget_id.clone().unwrap_or_default(),
                new_alert.period_start.unwrap_or_default(),
            );
            let mut open_keys = self.open_keys.write().unwrap();
            if !open_keys.insert(key) {
                return Ok(false);
            }
            let mut alerts = self.alerts.write().unwrap();
            let next_id = alerts.len() + 1;
            alerts.push(Alert {
                id: format!("alr_{}", next_id),
                user_id: new_alert.user_id,
                kind: new_alert.kind,
                budget_id: new_alert.budget_id,
                period_start: new_alert.period_start,
                severity: new_alert.severity,
                title: new_alert.title,
                message: new_alert.message,
                status: AlertStatus::New,
                created_at: Utc::now(),
                resolved_at: None,
            });
            Ok(true)
        }

        async fn set_status(
            &self,
            alert_id: &str,
            status: AlertStatus,
            resolved_at: Option<chrono::DateTime<Utc>>,
        ) -> Result<Alert> {
            let mut alerts = self.alerts.write().unwrap();
            let alert = alerts
                .iter_mut()
                .find(|a| a.id == alert_id)
                .ok_or_else(|| Error::NotFound(format!("alert {alert_id}")))?;
            alert.status = status;
            alert.resolved_at = resolved_at;
            Ok(alert.clone())
        }
    }

    fn spending_row(budget_id: &str, percentage: Decimal, is_exceeded: bool) -> BudgetSpending {
        BudgetSpending {
            budget_id: budget_id.to_string(),
            category: "dining".to_string(),
            subcategory: None,
            label: None,
            period_unit: PeriodUnit::Month,
            currency: "USD".to_string(),
            priority: 100,
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            cap_amount: dec!(200),
            carried_over: dec!(0),
            cap_amount_effective: dec!(200),
            spent: dec!(250),
            remaining: dec!(0),
            percentage,
            is_exceeded,
            status: if is_exceeded {
                BudgetHealth::Over
            } else {
                BudgetHealth::Good
            },
        }
    }

    fn service_with(
        rows: Vec<BudgetSpending>,
        alert_repository: Arc<MockAlertRepository>,
    ) -> AlertService {
        AlertService::new(
            Arc::new(MockBudgetRepository { budgets: vec![] }),
            Arc::new(MockSpendingService { rows, fail: false }),
            alert_repository,
        )
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 25).unwrap()
    }

    #[tokio::test]
    async fn repeated_check_creates_exactly_one_alert() {
        let repo = Arc::new(MockAlertRepository::new());
        let service = service_with(vec![spending_row("bgt_1", dec!(125.0), true)], repo.clone());

        let first = service.check_budgets("user-1", as_of()).await.unwrap();
        assert_eq!(first.alerts_created, 1);

        let second = service.check_budgets("user-1", as_of()).await.unwrap();
        assert_eq!(second.alerts_created, 0);
        assert_eq!(repo.alerts.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn within_cap_creates_nothing() {
        let repo = Arc::new(MockAlertRepository::new());
        let service = service_with(vec![spending_row("bgt_1", dec!(60.0), false)], repo.clone());

        let summary = service.check_budgets("user-1", as_of()).await.unwrap();
        assert_eq!(summary.alerts_created, 0);
        assert!(repo.alerts.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_does_not_abort_other_budgets() {
        let repo = Arc::new(MockAlertRepository::failing_for("bgt_1"));
        let service = service_with(
            vec![
                spending_row("bgt_1", dec!(130.0), true),
                spending_row("bgt_2", dec!(110.0), true),
            ],
            repo.clone(),
        );

        let summary = service.check_budgets("user-1", as_of()).await.unwrap();
        assert_eq!(summary.alerts_created, 1);
        assert_eq!(repo.alerts.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn aggregation_failure_propagates() {
        let service = AlertService::new(
            Arc::new(MockBudgetRepository { budgets: vec![] }),
            Arc::new(MockSpendingService {
                rows: vec![],
                fail: true,
            }),
            Arc::new(MockAlertRepository::new()),
        );
        let result = service.check_budgets("user-1", as_of()).await;
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn severity_escalates_at_critical_threshold() {
        let repo = Arc::new(MockAlertRepository::new());
        let service = service_with(
            vec![
                spending_row("bgt_1", dec!(125.0), true),
                spending_row("bgt_2", dec!(101.0), true),
            ],
            repo.clone(),
        );
        service.check_budgets("user-1", as_of()).await.unwrap();

        let alerts = repo.alerts.read().unwrap();
        let by_budget = |id: &str| {
            alerts
                .iter()
                .find(|a| a.budget_id.as_deref() == Some(id))
                .unwrap()
                .severity
        };
        assert_eq!(by_budget("bgt_1"), AlertSeverity::Critical);
        assert_eq!(by_budget("bgt_2"), AlertSeverity::Warn);
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let repo = Arc::new(MockAlertRepository::new());
        let service = service_with(vec![spending_row("bgt_1", dec!(125.0), true)], repo.clone());
        service.check_budgets("user-1", as_of()).await.unwrap();

        let resolved = service.resolve("user-1", "alr_1").await.unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        let again = service.resolve("user-1", "alr_1").await.unwrap();
        assert_eq!(again.status, AlertStatus::Resolved);

        // A resolved alert cannot be re-opened by acknowledging it.
        let acked = service.acknowledge("user-1", "alr_1").await.unwrap();
        assert_eq!(acked.status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn unknown_alert_is_not_found() {
        let service = service_with(vec![], Arc::new(MockAlertRepository::new()));
        let result = service.resolve("user-1", "alr_404").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
