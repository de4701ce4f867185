//! Database row types for automation rules.
//!
//! Trigger and action documents are stored as JSON text and deserialized
//! into the closed core types on load, so malformed documents surface as
//! validation errors instead of silently dead rules.

use diesel::prelude::*;

use spendguard_core::automations::AutomationRule;
use spendguard_core::Result;

use crate::utils::parse_timestamp;

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::automation_rules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AutomationRuleDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub enabled: bool,
    pub trigger_json: String,
    pub actions_json: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::automation_rules)]
pub struct NewAutomationRuleDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub enabled: bool,
    pub trigger_json: String,
    pub actions_json: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl AutomationRuleDB {
    pub fn into_domain(self) -> Result<AutomationRule> {
        Ok(AutomationRule {
            trigger: AutomationRule::parse_trigger(&self.trigger_json)?,
            actions: AutomationRule::parse_actions(&self.actions_json)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            enabled: self.enabled,
            version: self.version,
        })
    }
}
