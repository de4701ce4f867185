use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendguard_core::budgets::{Budget, BudgetRepositoryTrait, BudgetUpdate, NewBudget, PeriodUnit};
use spendguard_core::errors::{Error, Result, ValidationError};

use super::model::{BudgetDB, NewBudgetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budgets;
use crate::utils::{format_date, format_decimal, format_timestamp, new_id};

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }
}

fn load_budget(conn: &mut SqliteConnection, user_id: &str, budget_id: &str) -> Result<Budget> {
    let row = budgets::table
        .find(budget_id)
        .filter(budgets::user_id.eq(user_id))
        .first::<BudgetDB>(conn)
        .map_err(StorageError::from)?;
    row.into_domain()
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .order(budgets::created_at.asc())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(BudgetDB::into_domain).collect()
    }

    fn list_active_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::is_active.eq(true))
            .order(budgets::created_at.asc())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(BudgetDB::into_domain).collect()
    }

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let row = budgets::table
            .find(budget_id)
            .filter(budgets::user_id.eq(user_id))
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(BudgetDB::into_domain).transpose()
    }

    fn find_active_duplicate(
        &self,
        user_id: &str,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::is_active.eq(true))
            .filter(budgets::category.eq(category))
            .into_boxed();
        query = match subcategory {
            Some(sub) => query.filter(budgets::subcategory.eq(sub)),
            None => query.filter(budgets::subcategory.is_null()),
        };
        let row = query
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(BudgetDB::into_domain).transpose()
    }

    async fn create_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let now = format_timestamp(&Utc::now());
                let start_on = new_budget
                    .start_on
                    .unwrap_or_else(|| Utc::now().date_naive());
                let row = NewBudgetDB {
                    id: new_id("bgt_"),
                    user_id: user_id.clone(),
                    category: new_budget.category,
                    subcategory: new_budget.subcategory,
                    label: new_budget.label,
                    period_unit: new_budget
                        .period_unit
                        .unwrap_or(PeriodUnit::Month)
                        .as_str()
                        .to_string(),
                    cap_amount: format_decimal(new_budget.cap_amount),
                    currency: new_budget
                        .currency
                        .ok_or_else(|| ValidationError::MissingField("currency".to_string()))
                        .map_err(Error::Validation)?,
                    start_on: format_date(start_on),
                    rollover: new_budget.rollover,
                    priority: new_budget.priority.unwrap_or(100),
                    is_active: true,
                    created_at: now.clone(),
                    updated_at: now,
                };

                diesel::insert_into(budgets::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                load_budget(conn, &user_id, &row.id)
            })
            .await
    }

    async fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                // Scoping the update by owner makes a foreign id a no-op.
                let target = budgets::table
                    .find(&budget_id)
                    .filter(budgets::user_id.eq(&user_id));

                let affected = diesel::update(target)
                    .set((
                        update
                            .cap_amount
                            .map(|cap| budgets::cap_amount.eq(format_decimal(cap))),
                        update.label.map(|label| budgets::label.eq(label)),
                        update.rollover.map(|r| budgets::rollover.eq(r)),
                        update.priority.map(|p| budgets::priority.eq(p)),
                        update.is_active.map(|a| budgets::is_active.eq(a)),
                        budgets::updated_at.eq(format_timestamp(&Utc::now())),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if affected == 0 {
                    return Err(Error::NotFound(format!("budget {budget_id}")));
                }
                load_budget(conn, &user_id, &budget_id)
            })
            .await
    }
}
