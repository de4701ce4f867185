//! Spending summary models, recomputed on every read.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::PeriodUnit;
use crate::ledger::LedgerEntry;

/// Traffic-light presentation state of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    Over,
    Warning,
    Good,
}

/// Per-period spend state of one budget, derived per request and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSpending {
    pub budget_id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub label: Option<String>,
    pub period_unit: PeriodUnit,
    pub currency: String,
    pub priority: i32,
    /// Inclusive start of the window containing `as_of`.
    pub period_start: NaiveDate,
    /// Exclusive end of that window.
    pub period_end: NaiveDate,
    pub cap_amount: Decimal,
    /// Unused allowance carried in from the immediately preceding period;
    /// zero when rollover is disabled or this is the budget's first window.
    pub carried_over: Decimal,
    pub cap_amount_effective: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// `spent / cap_amount_effective * 100`, one decimal place.
    pub percentage: Decimal,
    /// Strictly greater than the effective cap.
    pub is_exceeded: bool,
    pub status: BudgetHealth,
}

/// A single budget's spending together with the entries behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSpendingDetail {
    pub spending: BudgetSpending,
    pub entries: Vec<LedgerEntry>,
    pub transaction_count: usize,
}
