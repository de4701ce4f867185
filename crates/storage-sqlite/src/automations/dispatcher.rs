//! Storage-backed action dispatcher.
//!
//! Flags accumulate as a keyed set with a conflict-ignoring insert, so two
//! rules flagging the same entry commute and replays are harmless.
//! Notifications and follow-ups are plain appends picked up by the
//! dashboard's inbox views.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendguard_core::automations::{ActionDispatcherTrait, ActionError, ActionType, RuleAction};
use spendguard_core::ledger::LedgerEntry;

use crate::db::{DbPool, WriteHandle};
use crate::schema::{entry_flags, follow_ups, notifications};
use crate::utils::{format_timestamp, new_id};

pub struct SqliteActionDispatcher {
    // The pool is unused for now; kept so the dispatcher can grow read-side
    // checks without changing construction sites.
    _pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteActionDispatcher {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteActionDispatcher {
            _pool: pool,
            writer,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = entry_flags)]
struct NewEntryFlagDB {
    entry_id: String,
    flag: String,
    severity: Option<String>,
    created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
struct NewNotificationDB {
    id: String,
    user_id: String,
    entry_id: Option<String>,
    rule_id: Option<String>,
    message: String,
    created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = follow_ups)]
struct NewFollowUpDB {
    id: String,
    user_id: String,
    entry_id: Option<String>,
    rule_id: Option<String>,
    title: String,
    status: String,
    created_at: String,
}

#[async_trait]
impl ActionDispatcherTrait for SqliteActionDispatcher {
    async fn execute(
        &self,
        action: &RuleAction,
        entry: &LedgerEntry,
    ) -> std::result::Result<(), ActionError> {
        let action = action.clone();
        let entry = entry.clone();
        let result = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> spendguard_core::Result<()> {
                let now = format_timestamp(&Utc::now());
                match action.action_type {
                    ActionType::FlagEntry => {
                        // Key the flag by severity so rules flagging at
                        // different levels accumulate instead of colliding.
                        let severity = action.severity.map(|s| s.as_str().to_string());
                        let row = NewEntryFlagDB {
                            entry_id: entry.id.clone(),
                            flag: severity
                                .clone()
                                .map_or_else(|| "flagged".to_string(), |s| format!("flagged:{s}")),
                            severity,
                            created_at: now,
                        };
                        // Set semantics: replaying the same flag is a no-op.
                        diesel::insert_into(entry_flags::table)
                            .values(&row)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .map_err(crate::errors::StorageError::from)?;
                    }
                    ActionType::Notify => {
                        let row = NewNotificationDB {
                            id: new_id("ntf_"),
                            user_id: entry.user_id.clone(),
                            entry_id: Some(entry.id.clone()),
                            rule_id: None,
                            message: format!(
                                "Transaction of {} {} at {} matched an automation rule",
                                entry.amount.abs(),
                                entry.currency,
                                entry.merchant.as_deref().unwrap_or("unknown merchant"),
                            ),
                            created_at: now,
                        };
                        diesel::insert_into(notifications::table)
                            .values(&row)
                            .execute(conn)
                            .map_err(crate::errors::StorageError::from)?;
                    }
                    ActionType::CreateFollowUp => {
                        let row = NewFollowUpDB {
                            id: new_id("fup_"),
                            user_id: entry.user_id.clone(),
                            entry_id: Some(entry.id.clone()),
                            rule_id: None,
                            title: format!(
                                "Review {} transaction in {}",
                                entry.amount.abs(),
                                entry.category
                            ),
                            status: "open".to_string(),
                            created_at: now,
                        };
                        diesel::insert_into(follow_ups::table)
                            .values(&row)
                            .execute(conn)
                            .map_err(crate::errors::StorageError::from)?;
                    }
                }
                Ok(())
            })
            .await;

        result.map_err(|e| ActionError::Storage(e.to_string()))
    }
}
