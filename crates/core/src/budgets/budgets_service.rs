use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::budgets::budgets_model::{Budget, BudgetUpdate, NewBudget};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::budgets::period::PeriodUnit;
use crate::constants::{DEFAULT_BUDGET_PRIORITY, DEFAULT_CURRENCY};
use crate::errors::{Error, Result, ValidationError};

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
}

impl BudgetService {
    pub fn new(repository: Arc<dyn BudgetRepositoryTrait>) -> Self {
        BudgetService { repository }
    }

    fn validate_cap(cap_amount: Decimal) -> Result<()> {
        if cap_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "cap amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        self.repository.list_budgets(user_id)
    }

    fn get_active_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        self.repository.list_active_budgets(user_id)
    }

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.repository
            .get_budget(user_id, budget_id)?
            .ok_or_else(|| Error::NotFound(format!("budget {budget_id}")))
    }

    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
        Self::validate_cap(new_budget.cap_amount)?;

        let category = new_budget.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "category".to_string(),
            )));
        }
        let subcategory = new_budget
            .subcategory
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        if let Some(existing) =
            self.repository
                .find_active_duplicate(user_id, &category, subcategory.as_deref())?
        {
            return Err(Error::Conflict(format!(
                "an active budget for '{}' already exists ({})",
                category, existing.id
            )));
        }

        let normalized = NewBudget {
            category,
            subcategory,
            label: new_budget.label,
            period_unit: Some(new_budget.period_unit.unwrap_or(PeriodUnit::Month)),
            cap_amount: new_budget.cap_amount,
            currency: Some(
                new_budget
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            start_on: Some(
                new_budget
                    .start_on
                    .unwrap_or_else(|| Utc::now().date_naive()),
            ),
            rollover: new_budget.rollover,
            priority: Some(new_budget.priority.unwrap_or(DEFAULT_BUDGET_PRIORITY)),
        };

        self.repository.create_budget(user_id, normalized).await
    }

    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        if let Some(cap_amount) = update.cap_amount {
            Self::validate_cap(cap_amount)?;
        }
        // Ownership check up front so a foreign id is rejected with no side effects.
        self.get_budget(user_id, budget_id)?;
        self.repository
            .update_budget(user_id, budget_id, update)
            .await
    }

    async fn deactivate_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.get_budget(user_id, budget_id)?;
        let update = BudgetUpdate {
            is_active: Some(false),
            ..BudgetUpdate::default()
        };
        self.repository
            .update_budget(user_id, budget_id, update)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::RwLock;

    struct MockBudgetRepository {
        budgets: RwLock<Vec<Budget>>,
    }

    impl MockBudgetRepository {
        fn new() -> Self {
            Self {
                budgets: RwLock::new(Vec::new()),
            }
        }

        fn with_budgets(budgets: Vec<Budget>) -> Self {
            Self {
                budgets: RwLock::new(budgets),
            }
        }
    }

    fn budget(id: &str, user_id: &str, category: &str) -> Budget {
        Budget {
            id: id.to_string(),
            user_id: user_id.to_string(),
            category: category.to_string(),
            subcategory: None,
            label: None,
            period_unit: PeriodUnit::Month,
            cap_amount: dec!(200),
            currency: "USD".to_string(),
            start_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rollover: false,
            priority: 100,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
            Ok(self
                .budgets
                .read()
                .unwrap()
                .iter()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect())
        }

        fn list_active_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
            Ok(self
                .budgets
                .read()
                .unwrap()
                .iter()
                .filter(|b| b.user_id == user_id && b.is_active)
                .cloned()
                .collect())
        }

        fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
            Ok(self
                .budgets
                .read()
                .unwrap()
                .iter()
                .find(|b| b.user_id == user_id && b.id == budget_id)
                .cloned())
        }

        fn find_active_duplicate(
            &self,
            user_id: &str,
            category: &str,
            subcategory: Option<&str>,
        ) -> Result<Option<Budget>> {
            Ok(self
                .budgets
                .read()
                .unwrap()
                .iter()
                .find(|b| {
                    b.user_id == user_id
                        && b.is_active
                        && b.category == category
                        && b.subcategory.as_deref() == subcategory
                })
                .cloned())
        }

        async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
            let created = Budget {
                id: format!("bgt_{}", self.budgets.read().unwrap().len() + 1),
                user_id: user_id.to_string(),
                category: new_budget.category,
                subcategory: new_budget.subcategory,
                label: new_budget.label,
                period_unit: new_budget.period_unit.unwrap(),
                cap_amount: new_budget.cap_amount,
                currency: new_budget.currency.unwrap(),
                start_on: new_budget.start_on.unwrap(),
                rollover: new_budget.rollover,
                priority: new_budget.priority.unwrap(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.budgets.write().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_budget(
            &self,
            user_id: &str,
            budget_id: &str,
            update: BudgetUpdate,
        ) -> Result<Budget> {
            let mut budgets = self.budgets.write().unwrap();
            let stored = budgets
                .iter_mut()
                .find(|b| b.user_id == user_id && b.id == budget_id)
                .ok_or_else(|| Error::NotFound(format!("budget {budget_id}")))?;
            if let Some(cap_amount) = update.cap_amount {
                stored.cap_amount = cap_amount;
            }
            if let Some(label) = update.label {
                stored.label = Some(label);
            }
            if let Some(rollover) = update.rollover {
                stored.rollover = rollover;
            }
            if let Some(priority) = update.priority {
                stored.priority = priority;
            }
            if let Some(is_active) = update.is_active {
                stored.is_active = is_active;
            }
            Ok(stored.clone())
        }
    }

    fn new_budget(category: &str, cap_amount: Decimal) -> NewBudget {
        NewBudget {
            category: category.to_string(),
            subcategory: None,
            label: None,
            period_unit: None,
            cap_amount,
            currency: None,
            start_on: None,
            rollover: false,
            priority: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_normalizes_category() {
        let service = BudgetService::new(Arc::new(MockBudgetRepository::new()));
        let created = service
            .create_budget("user-1", new_budget("  Dining ", dec!(200)))
            .await
            .unwrap();

        assert_eq!(created.category, "dining");
        assert_eq!(created.period_unit, PeriodUnit::Month);
        assert_eq!(created.currency, "USD");
        assert_eq!(created.priority, 100);
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_cap() {
        let service = BudgetService::new(Arc::new(MockBudgetRepository::new()));
        for cap in [dec!(0), dec!(-25)] {
            let result = service.create_budget("user-1", new_budget("food", cap)).await;
            assert!(matches!(result, Err(Error::Validation(_))));
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_active_budget() {
        let repo = MockBudgetRepository::with_budgets(vec![budget("bgt_1", "user-1", "dining")]);
        let service = BudgetService::new(Arc::new(repo));
        let result = service
            .create_budget("user-1", new_budget("Dining", dec!(300)))
            .await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn update_of_foreign_budget_is_not_found() {
        let repo = MockBudgetRepository::with_budgets(vec![budget("bgt_1", "user-1", "dining")]);
        let service = BudgetService::new(Arc::new(repo));
        let result = service
            .update_budget(
                "user-2",
                "bgt_1",
                BudgetUpdate {
                    cap_amount: Some(dec!(50)),
                    ..BudgetUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn deactivate_soft_disables() {
        let repo = MockBudgetRepository::with_budgets(vec![budget("bgt_1", "user-1", "dining")]);
        let service = BudgetService::new(Arc::new(repo));
        let updated = service.deactivate_budget("user-1", "bgt_1").await.unwrap();
        assert!(!updated.is_active);
    }
}
