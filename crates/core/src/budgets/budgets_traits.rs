use crate::budgets::budgets_model::{Budget, BudgetUpdate, NewBudget};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn list_active_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>>;
    /// Finds another active budget covering the same (category, subcategory).
    fn find_active_duplicate(
        &self,
        user_id: &str,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Option<Budget>>;
    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn get_active_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn deactivate_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
}
