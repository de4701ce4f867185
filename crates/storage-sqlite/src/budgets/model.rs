//! Database row types for budgets.

use diesel::prelude::*;

use spendguard_core::budgets::Budget;
use spendguard_core::Result;

use crate::utils::{parse_date, parse_decimal, parse_timestamp};

#[derive(Queryable, Identifiable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub label: Option<String>,
    pub period_unit: String,
    pub cap_amount: String,
    pub currency: String,
    pub start_on: String,
    pub rollover: bool,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
pub struct NewBudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub label: Option<String>,
    pub period_unit: String,
    pub cap_amount: String,
    pub currency: String,
    pub start_on: String,
    pub rollover: bool,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl BudgetDB {
    pub fn into_domain(self) -> Result<Budget> {
        Ok(Budget {
            period_unit: self.period_unit.parse()?,
            cap_amount: parse_decimal(&self.cap_amount)?,
            start_on: parse_date(&self.start_on)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
            user_id: self.user_id,
            category: self.category,
            subcategory: self.subcategory,
            label: self.label,
            currency: self.currency,
            rollover: self.rollover,
            priority: self.priority,
            is_active: self.is_active,
        })
    }
}
