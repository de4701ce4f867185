//! Rule evaluation: condition matching and action dispatch.

use std::sync::Arc;

use log::warn;

use crate::automations::automations_model::{
    ActionOutcome, AutomationRule, ConditionOperator, ConditionValue, ExecutedAction, FieldValue,
    RuleCondition,
};
use crate::automations::automations_traits::ActionDispatcherTrait;
use crate::ledger::LedgerEntry;

pub struct RuleEngine {
    dispatcher: Arc<dyn ActionDispatcherTrait>,
}

impl RuleEngine {
    pub fn new(dispatcher: Arc<dyn ActionDispatcherTrait>) -> Self {
        RuleEngine { dispatcher }
    }

    /// Matches one entry against a rule set and executes the actions of
    /// every matching rule.
    ///
    /// Enabled rules run in ascending creation order. A failing action is
    /// recorded in its outcome and never blocks later actions or rules.
    pub async fn evaluate(
        &self,
        entry: &LedgerEntry,
        rules: &[AutomationRule],
    ) -> Vec<ExecutedAction> {
        let mut ordered: Vec<&AutomationRule> = rules.iter().filter(|r| r.enabled).collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut executed = Vec::new();
        for rule in ordered {
            if !rule_matches(rule, entry) {
                continue;
            }
            for action in &rule.actions {
                let outcome = match self.dispatcher.execute(action, entry).await {
                    Ok(()) => ActionOutcome::Completed,
                    Err(err) => {
                        warn!(
                            "action {:?} of rule {} failed for entry {}: {err}",
                            action.action_type, rule.id, entry.id
                        );
                        ActionOutcome::Failed(err.to_string())
                    }
                };
                executed.push(ExecutedAction {
                    rule_id: rule.id.clone(),
                    rule_name: rule.name.clone(),
                    action_type: action.action_type,
                    severity: action.severity,
                    outcome,
                });
            }
        }
        executed
    }
}

/// A rule matches when every condition of its trigger holds (conjunction).
pub fn rule_matches(rule: &AutomationRule, entry: &LedgerEntry) -> bool {
    rule.trigger
        .conditions
        .iter()
        .all(|condition| condition_matches(condition, entry))
}

/// Evaluates one condition. A field absent on the entry, or a comparison
/// across mismatched types, evaluates false - never an error.
pub fn condition_matches(condition: &RuleCondition, entry: &LedgerEntry) -> bool {
    let Some(actual) = condition.field.resolve(entry) else {
        return false;
    };
    apply_operator(&actual, condition.operator, &condition.value)
}

fn apply_operator(actual: &FieldValue, operator: ConditionOperator, expected: &ConditionValue) -> bool {
    use ConditionOperator::*;
    match operator {
        Equals => values_equal(actual, expected),
        NotEquals => !values_equal(actual, expected),
        GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
        GreaterOrEqual => compare_numbers(actual, expected, |a, b| a >= b),
        LessThan => compare_numbers(actual, expected, |a, b| a < b),
        LessOrEqual => compare_numbers(actual, expected, |a, b| a <= b),
        Contains => match (actual, expected) {
            (FieldValue::Text(haystack), ConditionValue::Text(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        },
        In => match expected {
            ConditionValue::List(items) => items.iter().any(|item| values_equal(actual, item)),
            _ => false,
        },
    }
}

fn values_equal(actual: &FieldValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (FieldValue::Number(a), ConditionValue::Number(b)) => a == b,
        (FieldValue::Text(a), ConditionValue::Text(b)) => a.eq_ignore_ascii_case(b),
        (FieldValue::Bool(a), ConditionValue::Bool(b)) => a == b,
        _ => false,
    }
}

fn compare_numbers<F>(actual: &FieldValue, expected: &ConditionValue, cmp: F) -> bool
where
    F: Fn(rust_decimal::Decimal, rust_decimal::Decimal) -> bool,
{
    match (actual, expected) {
        (FieldValue::Number(a), ConditionValue::Number(b)) => cmp(*a, *b),
        _ => false,
    }
}
