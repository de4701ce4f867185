//! Automation rule domain models.
//!
//! Rules arrive from the UI as JSON documents. Operators, fields, and action
//! types are closed enums, so an unrecognized value is rejected when the
//! document is deserialized instead of surfacing as a missed match at
//! evaluation time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alerts::AlertSeverity;
use crate::errors::Result;
use crate::ledger::LedgerEntry;

/// Events a rule can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    TransactionCreated,
}

/// Entry attributes a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerField {
    Amount,
    Category,
    Subcategory,
    Merchant,
    AccountId,
    Currency,
    Pending,
}

impl TriggerField {
    /// Typed accessor: returns the entry's value for this field, or `None`
    /// when the entry does not carry it. Amount resolves to the magnitude,
    /// matching how rule authors think about spend.
    pub fn resolve(&self, entry: &LedgerEntry) -> Option<FieldValue> {
        match self {
            TriggerField::Amount => Some(FieldValue::Number(entry.amount.abs())),
            TriggerField::Category => Some(FieldValue::Text(entry.category.clone())),
            TriggerField::Subcategory => entry.subcategory.clone().map(FieldValue::Text),
            TriggerField::Merchant => entry.merchant.clone().map(FieldValue::Text),
            TriggerField::AccountId => Some(FieldValue::Text(entry.account_id.clone())),
            TriggerField::Currency => Some(FieldValue::Text(entry.currency.clone())),
            TriggerField::Pending => Some(FieldValue::Bool(entry.pending)),
        }
    }
}

/// A field value read off an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
    Bool(bool),
}

/// A value a condition compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(Decimal),
    Text(String),
    List(Vec<ConditionValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    In,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub field: TriggerField,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

/// Trigger: event type plus the conjunction of conditions to satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrigger {
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    FlagEntry,
    Notify,
    CreateFollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub enabled: bool,
    pub trigger: RuleTrigger,
    pub actions: Vec<RuleAction>,
    /// Bumped on every edit, including enable/disable toggles; callers must
    /// echo the version they last observed to update the rule.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AutomationRule {
    pub fn trigger_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.trigger)
            .map_err(crate::errors::ValidationError::MalformedRule)?)
    }

    pub fn actions_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions)
            .map_err(crate::errors::ValidationError::MalformedRule)?)
    }

    pub fn parse_trigger(raw: &str) -> Result<RuleTrigger> {
        Ok(serde_json::from_str(raw).map_err(crate::errors::ValidationError::MalformedRule)?)
    }

    pub fn parse_actions(raw: &str) -> Result<Vec<RuleAction>> {
        Ok(serde_json::from_str(raw).map_err(crate::errors::ValidationError::MalformedRule)?)
    }
}

/// Input model for creating a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAutomationRule {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub trigger: RuleTrigger,
    pub actions: Vec<RuleAction>,
}

fn default_enabled() -> bool {
    true
}

/// PATCH body for a rule: the last-seen `version` authorizes the edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleUpdate {
    pub version: i64,
    pub enabled: Option<bool>,
    pub name: Option<String>,
    pub trigger: Option<RuleTrigger>,
    pub actions: Option<Vec<RuleAction>>,
}

/// Field changes applied once the version check passed.
#[derive(Debug, Clone, Default)]
pub struct RuleChanges {
    pub enabled: Option<bool>,
    pub name: Option<String>,
    pub trigger: Option<RuleTrigger>,
    pub actions: Option<Vec<RuleAction>>,
}

/// Error produced by the action dispatcher.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("action storage failed: {0}")]
    Storage(String),

    #[error("unsupported action: {0}")]
    Unsupported(String),
}

/// Outcome of one dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum ActionOutcome {
    Completed,
    Failed(String),
}

/// One action executed (or attempted) while evaluating an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedAction {
    pub rule_id: String,
    pub rule_name: String,
    pub action_type: ActionType,
    pub severity: Option<AlertSeverity>,
    pub outcome: ActionOutcome,
}
