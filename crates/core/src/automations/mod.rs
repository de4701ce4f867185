//! Automations module - the condition/action rule engine.

mod automations_model;
mod automations_service;
mod automations_traits;
pub mod engine;

pub use automations_model::{
    ActionError, ActionOutcome, ActionType, AutomationRule, ConditionOperator, ConditionValue,
    ExecutedAction, FieldValue, NewAutomationRule, RuleAction, RuleChanges, RuleCondition,
    RuleTrigger, RuleUpdate, TriggerField, TriggerType,
};
pub use automations_service::AutomationService;
pub use automations_traits::{
    ActionDispatcherTrait, AutomationRuleRepositoryTrait, AutomationServiceTrait,
};
pub use engine::RuleEngine;
