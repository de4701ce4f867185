use crate::automations::automations_model::{
    ActionError, AutomationRule, ExecutedAction, NewAutomationRule, RuleAction, RuleChanges,
    RuleUpdate,
};
use crate::errors::Result;
use crate::ledger::LedgerEntry;
use async_trait::async_trait;

/// Trait for automation rule repository operations
#[async_trait]
pub trait AutomationRuleRepositoryTrait: Send + Sync {
    /// Rules in ascending creation order.
    fn list_rules(&self, user_id: &str) -> Result<Vec<AutomationRule>>;

    fn get_rule(&self, user_id: &str, rule_id: &str) -> Result<Option<AutomationRule>>;

    async fn create_rule(
        &self,
        user_id: &str,
        new_rule: NewAutomationRule,
    ) -> Result<AutomationRule>;

    /// Applies `changes` only when the stored version equals
    /// `expected_version`, bumping the version by one. Returns `None` when
    /// the version is stale; the stored rule is left untouched.
    async fn update_rule_versioned(
        &self,
        user_id: &str,
        rule_id: &str,
        expected_version: i64,
        changes: RuleChanges,
    ) -> Result<Option<AutomationRule>>;
}

/// Trait for dispatching a matched rule's side effects
#[async_trait]
pub trait ActionDispatcherTrait: Send + Sync {
    async fn execute(
        &self,
        action: &RuleAction,
        entry: &LedgerEntry,
    ) -> std::result::Result<(), ActionError>;
}

/// Trait for automation service operations
#[async_trait]
pub trait AutomationServiceTrait: Send + Sync {
    fn get_rules(&self, user_id: &str) -> Result<Vec<AutomationRule>>;

    fn get_rule(&self, user_id: &str, rule_id: &str) -> Result<AutomationRule>;

    async fn create_rule(
        &self,
        user_id: &str,
        new_rule: NewAutomationRule,
    ) -> Result<AutomationRule>;

    async fn update_rule(
        &self,
        user_id: &str,
        rule_id: &str,
        update: RuleUpdate,
    ) -> Result<AutomationRule>;

    /// Runs the rule engine for one freshly ingested entry.
    async fn evaluate_entry(&self, entry: &LedgerEntry) -> Result<Vec<ExecutedAction>>;
}
