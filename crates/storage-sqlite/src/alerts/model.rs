//! Database row types for alerts.

use diesel::prelude::*;

use spendguard_core::alerts::Alert;
use spendguard_core::Result;

use crate::utils::{parse_date, parse_timestamp};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlertDB {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub budget_id: Option<String>,
    pub period_start: Option<String>,
    pub severity: String,
    pub title: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::alerts)]
pub struct NewAlertDB {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub budget_id: Option<String>,
    pub period_start: Option<String>,
    pub severity: String,
    pub title: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl AlertDB {
    pub fn into_domain(self) -> Result<Alert> {
        Ok(Alert {
            kind: self.kind.parse()?,
            period_start: self.period_start.as_deref().map(parse_date).transpose()?,
            severity: self.severity.parse()?,
            status: self.status.parse()?,
            created_at: parse_timestamp(&self.created_at)?,
            resolved_at: self
                .resolved_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            id: self.id,
            user_id: self.user_id,
            budget_id: self.budget_id,
            title: self.title,
            message: self.message,
        })
    }
}
