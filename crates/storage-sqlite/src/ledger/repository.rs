use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendguard_core::errors::Result;
use spendguard_core::ledger::{LedgerEntry, LedgerRepositoryTrait, NewLedgerEntry};

use super::model::{LedgerEntryDB, NewLedgerEntryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::ledger_entries;
use crate::utils::{day_start_timestamp, format_decimal, format_timestamp, new_id};

pub struct LedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        LedgerRepository { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn list_entries_in_window(
        &self,
        user_id: &str,
        category: &str,
        subcategory: Option<&str>,
        from_inclusive: NaiveDate,
        to_exclusive: NaiveDate,
    ) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        // Timestamps share one canonical rendering, so the range scan is a
        // plain lexicographic comparison.
        let lower = day_start_timestamp(from_inclusive);
        let upper = day_start_timestamp(to_exclusive);

        let mut query = ledger_entries::table
            .filter(ledger_entries::user_id.eq(user_id))
            .filter(ledger_entries::pending.eq(false))
            .filter(ledger_entries::category.eq(category))
            .filter(ledger_entries::posted_at.ge(lower))
            .filter(ledger_entries::posted_at.lt(upper))
            .into_boxed();
        if let Some(sub) = subcategory {
            query = query.filter(ledger_entries::subcategory.eq(sub));
        }

        let rows = query
            .order(ledger_entries::posted_at.asc())
            .load::<LedgerEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(LedgerEntryDB::into_domain).collect()
    }

    fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<Option<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let row = ledger_entries::table
            .find(entry_id)
            .filter(ledger_entries::user_id.eq(user_id))
            .first::<LedgerEntryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(LedgerEntryDB::into_domain).transpose()
    }

    async fn insert_entry(&self, user_id: &str, new_entry: NewLedgerEntry) -> Result<LedgerEntry> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<LedgerEntry> {
                let row = NewLedgerEntryDB {
                    id: new_id("txn_"),
                    user_id,
                    account_id: new_entry.account_id,
                    posted_at: format_timestamp(&new_entry.posted_at),
                    amount: format_decimal(new_entry.amount),
                    currency: new_entry.currency,
                    category: new_entry.category.to_lowercase(),
                    subcategory: new_entry.subcategory.map(|s| s.to_lowercase()),
                    merchant: new_entry.merchant,
                    pending: new_entry.pending,
                    created_at: format_timestamp(&Utc::now()),
                };

                diesel::insert_into(ledger_entries::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                ledger_entries::table
                    .find(&row.id)
                    .first::<LedgerEntryDB>(conn)
                    .map_err(StorageError::from)?
                    .into_domain()
            })
            .await
    }
}
