//! Budget domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::period::PeriodUnit;

/// A recurring spending cap owned by a single user.
///
/// Budgets are soft-disabled through `is_active` rather than deleted, so
/// alerts raised in earlier periods keep a valid reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub label: Option<String>,
    pub period_unit: PeriodUnit,
    pub cap_amount: Decimal,
    pub currency: String,
    /// Anchor date: defines the phase of the recurring windows.
    pub start_on: NaiveDate,
    /// Carry unused allowance from the immediately preceding period forward.
    pub rollover: bool,
    /// Lower value = higher precedence when budgets overlap a category.
    /// Presentation-only; never excludes an entry from another budget.
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub subcategory: Option<String>,
    pub label: Option<String>,
    pub period_unit: Option<PeriodUnit>,
    pub cap_amount: Decimal,
    pub currency: Option<String>,
    pub start_on: Option<NaiveDate>,
    #[serde(default)]
    pub rollover: bool,
    pub priority: Option<i32>,
}

/// Partial update for an existing budget; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub cap_amount: Option<Decimal>,
    pub label: Option<String>,
    pub rollover: Option<bool>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}
