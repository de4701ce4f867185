use std::sync::Arc;

use async_trait::async_trait;

use crate::automations::automations_model::{
    AutomationRule, ExecutedAction, NewAutomationRule, RuleChanges, RuleUpdate,
};
use crate::automations::automations_traits::{
    ActionDispatcherTrait, AutomationRuleRepositoryTrait, AutomationServiceTrait,
};
use crate::automations::engine::RuleEngine;
use crate::errors::{Error, Result, ValidationError};
use crate::ledger::LedgerEntry;

pub struct AutomationService {
    rule_repository: Arc<dyn AutomationRuleRepositoryTrait>,
    engine: RuleEngine,
}

impl AutomationService {
    pub fn new(
        rule_repository: Arc<dyn AutomationRuleRepositoryTrait>,
        dispatcher: Arc<dyn ActionDispatcherTrait>,
    ) -> Self {
        AutomationService {
            rule_repository,
            engine: RuleEngine::new(dispatcher),
        }
    }
}

#[async_trait]
impl AutomationServiceTrait for AutomationService {
    fn get_rules(&self, user_id: &str) -> Result<Vec<AutomationRule>> {
        self.rule_repository.list_rules(user_id)
    }

    fn get_rule(&self, user_id: &str, rule_id: &str) -> Result<AutomationRule> {
        self.rule_repository
            .get_rule(user_id, rule_id)?
            .ok_or_else(|| Error::NotFound(format!("automation rule {rule_id}")))
    }

    async fn create_rule(
        &self,
        user_id: &str,
        new_rule: NewAutomationRule,
    ) -> Result<AutomationRule> {
        if new_rule.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if new_rule.actions.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "a rule needs at least one action".to_string(),
            )));
        }
        self.rule_repository.create_rule(user_id, new_rule).await
    }

    async fn update_rule(
        &self,
        user_id: &str,
        rule_id: &str,
        update: RuleUpdate,
    ) -> Result<AutomationRule> {
        if let Some(actions) = &update.actions {
            if actions.is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "a rule needs at least one action".to_string(),
                )));
            }
        }
        // Ownership first: a foreign rule is NotFound, not Conflict.
        let stored = self.get_rule(user_id, rule_id)?;

        let changes = RuleChanges {
            enabled: update.enabled,
            name: update.name,
            trigger: update.trigger,
            actions: update.actions,
        };
        match self
            .rule_repository
            .update_rule_versioned(user_id, rule_id, update.version, changes)
            .await?
        {
            Some(updated) => Ok(updated),
            None => Err(Error::Conflict(format!(
                "automation rule {} changed since version {} (now {})",
                rule_id, update.version, stored.version
            ))),
        }
    }

    async fn evaluate_entry(&self, entry: &LedgerEntry) -> Result<Vec<ExecutedAction>> {
        let rules = self.rule_repository.list_rules(&entry.user_id)?;
        Ok(self.engine.evaluate(entry, &rules).await)
    }
}
