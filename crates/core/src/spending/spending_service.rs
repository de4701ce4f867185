use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;

use crate::budgets::{period, Budget};
use crate::constants::{PERCENTAGE_DECIMAL_PRECISION, WARNING_THRESHOLD_PERCENT};
use crate::errors::Result;
use crate::ledger::{LedgerEntry, LedgerRepositoryTrait};
use crate::spending::spending_model::{BudgetHealth, BudgetSpending, BudgetSpendingDetail};
use crate::spending::spending_traits::SpendingServiceTrait;

pub struct SpendingService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
}

impl SpendingService {
    pub fn new(ledger_repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        SpendingService { ledger_repository }
    }

    fn compute(
        &self,
        user_id: &str,
        budget: &Budget,
        as_of: NaiveDate,
    ) -> Result<(BudgetSpending, Vec<LedgerEntry>)> {
        let window = period::window_containing(budget.start_on, budget.period_unit, as_of);
        let entries = self.ledger_repository.list_entries_in_window(
            user_id,
            &budget.category,
            budget.subcategory.as_deref(),
            window.start,
            window.end,
        )?;
        let spent = window_spend(&entries);

        // Rollover carries leftover allowance from the immediately preceding
        // window only; earlier periods never compound.
        let carried_over = if budget.rollover {
            match period::previous_window(budget.start_on, budget.period_unit, &window) {
                Some(previous) => {
                    let previous_entries = self.ledger_repository.list_entries_in_window(
                        user_id,
                        &budget.category,
                        budget.subcategory.as_deref(),
                        previous.start,
                        previous.end,
                    )?;
                    (budget.cap_amount - window_spend(&previous_entries)).max(Decimal::ZERO)
                }
                None => Decimal::ZERO,
            }
        } else {
            Decimal::ZERO
        };

        let cap_amount_effective = budget.cap_amount + carried_over;
        let remaining = (cap_amount_effective - spent).max(Decimal::ZERO);
        // cap_amount is validated positive, so the effective cap never is zero.
        let percentage = (spent / cap_amount_effective * Decimal::ONE_HUNDRED)
            .round_dp(PERCENTAGE_DECIMAL_PRECISION);
        let is_exceeded = spent > cap_amount_effective;
        let status = if is_exceeded {
            BudgetHealth::Over
        } else if percentage >= Decimal::from(WARNING_THRESHOLD_PERCENT) {
            BudgetHealth::Warning
        } else {
            BudgetHealth::Good
        };

        debug!(
            "budget {} window {}..{}: spent {} of {}",
            budget.id, window.start, window.end, spent, cap_amount_effective
        );

        let spending = BudgetSpending {
            budget_id: budget.id.clone(),
            category: budget.category.clone(),
            subcategory: budget.subcategory.clone(),
            label: budget.label.clone(),
            period_unit: budget.period_unit,
            currency: budget.currency.clone(),
            priority: budget.priority,
            period_start: window.start,
            period_end: window.end,
            cap_amount: budget.cap_amount,
            carried_over,
            cap_amount_effective,
            spent,
            remaining,
            percentage,
            is_exceeded,
            status,
        };
        Ok((spending, entries))
    }
}

impl SpendingServiceTrait for SpendingService {
    fn summarize(
        &self,
        user_id: &str,
        budgets: &[Budget],
        as_of: NaiveDate,
    ) -> Result<Vec<BudgetSpending>> {
        let mut rows = Vec::with_capacity(budgets.len());
        for budget in budgets.iter().filter(|b| b.is_active) {
            let (spending, _) = self.compute(user_id, budget, as_of)?;
            rows.push(spending);
        }
        // Hottest budgets first; id tie-break keeps the order deterministic.
        rows.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.budget_id.cmp(&b.budget_id))
        });
        Ok(rows)
    }

    fn summarize_budget(
        &self,
        user_id: &str,
        budget: &Budget,
        as_of: NaiveDate,
    ) -> Result<BudgetSpendingDetail> {
        let (spending, entries) = self.compute(user_id, budget, as_of)?;
        let transaction_count = entries.len();
        Ok(BudgetSpendingDetail {
            spending,
            entries,
            transaction_count,
        })
    }
}

/// Sum of debit magnitudes, reduced by credits/refunds in the same window,
/// floored at zero.
fn window_spend(entries: &[LedgerEntry]) -> Decimal {
    let mut debits = Decimal::zero();
    let mut credits = Decimal::zero();
    for entry in entries {
        if entry.is_debit() {
            debits += entry.amount.abs();
        } else {
            credits += entry.amount;
        }
    }
    (debits - credits).max(Decimal::ZERO)
}
