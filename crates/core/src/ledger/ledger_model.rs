//! Ledger domain models.
//!
//! Ledger entries are written by the external account-linking pipeline and
//! are read-only to the budget core; the only mutation this crate performs
//! is persisting entries handed in through the ingestion webhook.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A posted or pending transaction on a linked account.
///
/// `amount` is signed: debits are negative, credits/refunds positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub posted_at: DateTime<Utc>,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub merchant: Option<String>,
    pub pending: bool,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Magnitude of spend this entry contributes; zero for credits.
    pub fn debit_amount(&self) -> Decimal {
        if self.is_debit() {
            self.amount.abs()
        } else {
            Decimal::ZERO
        }
    }
}

/// Input model for the ingestion webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    pub account_id: String,
    pub posted_at: DateTime<Utc>,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub merchant: Option<String>,
    #[serde(default)]
    pub pending: bool,
}
