use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendguard_core::automations::{
    AutomationRule, AutomationRuleRepositoryTrait, NewAutomationRule, RuleChanges,
};
use spendguard_core::errors::{Result, ValidationError};

use super::model::{AutomationRuleDB, NewAutomationRuleDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::automation_rules;
use crate::utils::{format_timestamp, new_id};

pub struct AutomationRuleRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AutomationRuleRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AutomationRuleRepository { pool, writer }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value).map_err(ValidationError::MalformedRule)?)
}

#[async_trait]
impl AutomationRuleRepositoryTrait for AutomationRuleRepository {
    fn list_rules(&self, user_id: &str) -> Result<Vec<AutomationRule>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = automation_rules::table
            .filter(automation_rules::user_id.eq(user_id))
            .order((
                automation_rules::created_at.asc(),
                automation_rules::id.asc(),
            ))
            .load::<AutomationRuleDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(AutomationRuleDB::into_domain).collect()
    }

    fn get_rule(&self, user_id: &str, rule_id: &str) -> Result<Option<AutomationRule>> {
        let mut conn = get_connection(&self.pool)?;
        let row = automation_rules::table
            .find(rule_id)
            .filter(automation_rules::user_id.eq(user_id))
            .first::<AutomationRuleDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(AutomationRuleDB::into_domain).transpose()
    }

    async fn create_rule(
        &self,
        user_id: &str,
        new_rule: NewAutomationRule,
    ) -> Result<AutomationRule> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AutomationRule> {
                let now = format_timestamp(&Utc::now());
                let row = NewAutomationRuleDB {
                    id: new_id("rul_"),
                    user_id,
                    name: new_rule.name,
                    enabled: new_rule.enabled,
                    trigger_json: to_json(&new_rule.trigger)?,
                    actions_json: to_json(&new_rule.actions)?,
                    version: 1,
                    created_at: now.clone(),
                    updated_at: now,
                };

                diesel::insert_into(automation_rules::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                automation_rules::table
                    .find(&row.id)
                    .first::<AutomationRuleDB>(conn)
                    .map_err(StorageError::from)?
                    .into_domain()
            })
            .await
    }

    async fn update_rule_versioned(
        &self,
        user_id: &str,
        rule_id: &str,
        expected_version: i64,
        changes: RuleChanges,
    ) -> Result<Option<AutomationRule>> {
        let user_id = user_id.to_string();
        let rule_id = rule_id.to_string();
        let trigger_json = changes.trigger.as_ref().map(to_json).transpose()?;
        let actions_json = changes.actions.as_ref().map(to_json).transpose()?;

        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<AutomationRule>> {
                    // The version guard in the WHERE clause is the optimistic
                    // lock: a stale writer updates zero rows.
                    let target = automation_rules::table
                        .find(&rule_id)
                        .filter(automation_rules::user_id.eq(&user_id))
                        .filter(automation_rules::version.eq(expected_version));

                    let affected = diesel::update(target)
                        .set((
                            changes.enabled.map(|e| automation_rules::enabled.eq(e)),
                            changes.name.map(|n| automation_rules::name.eq(n)),
                            trigger_json.map(|t| automation_rules::trigger_json.eq(t)),
                            actions_json.map(|a| automation_rules::actions_json.eq(a)),
                            automation_rules::version.eq(expected_version + 1),
                            automation_rules::updated_at.eq(format_timestamp(&Utc::now())),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;

                    if affected == 0 {
                        return Ok(None);
                    }
                    automation_rules::table
                        .find(&rule_id)
                        .first::<AutomationRuleDB>(conn)
                        .map_err(StorageError::from)?
                        .into_domain()
                        .map(Some)
                },
            )
            .await
    }
}
