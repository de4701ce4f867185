//! Database row types for ledger entries.

use diesel::prelude::*;

use spendguard_core::ledger::LedgerEntry;
use spendguard_core::Result;

use crate::utils::{parse_decimal, parse_timestamp};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub posted_at: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub merchant: Option<String>,
    pub pending: bool,
    pub created_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
pub struct NewLedgerEntryDB {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub posted_at: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub merchant: Option<String>,
    pub pending: bool,
    pub created_at: String,
}

impl LedgerEntryDB {
    pub fn into_domain(self) -> Result<LedgerEntry> {
        Ok(LedgerEntry {
            posted_at: parse_timestamp(&self.posted_at)?,
            amount: parse_decimal(&self.amount)?,
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            user_id: self.user_id,
            account_id: self.account_id,
            currency: self.currency,
            category: self.category,
            subcategory: self.subcategory,
            merchant: self.merchant,
            pending: self.pending,
        })
    }
}
