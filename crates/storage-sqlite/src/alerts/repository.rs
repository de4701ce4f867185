use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendguard_core::alerts::{Alert, AlertRepositoryTrait, AlertStatus, NewAlert};
use spendguard_core::errors::{Error, Result};

use super::model::{AlertDB, NewAlertDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::alerts;
use crate::utils::{format_date, format_timestamp, new_id};

pub struct AlertRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AlertRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AlertRepository { pool, writer }
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    fn list_alerts(&self, user_id: &str, status: Option<AlertStatus>) -> Result<Vec<Alert>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = alerts::table
            .filter(alerts::user_id.eq(user_id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(alerts::status.eq(status.as_str()));
        }
        let rows = query
            .order(alerts::created_at.desc())
            .load::<AlertDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(AlertDB::into_domain).collect()
    }

    fn get_alert(&self, user_id: &str, alert_id: &str) -> Result<Option<Alert>> {
        let mut conn = get_connection(&self.pool)?;
        let row = alerts::table
            .find(alert_id)
            .filter(alerts::user_id.eq(user_id))
            .first::<AlertDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(AlertDB::into_domain).transpose()
    }

    async fn create_if_absent(&self, new_alert: NewAlert) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let row = NewAlertDB {
                    id: new_id("alr_"),
                    user_id: new_alert.user_id,
                    kind: new_alert.kind.as_str().to_string(),
                    budget_id: new_alert.budget_id,
                    period_start: new_alert.period_start.map(format_date),
                    severity: new_alert.severity.as_str().to_string(),
                    title: new_alert.title,
                    message: new_alert.message,
                    status: AlertStatus::New.as_str().to_string(),
                    created_at: format_timestamp(&Utc::now()),
                };

                // The partial unique index on (budget_id, period_start) for
                // unresolved budget alerts makes this insert the atomic
                // create-if-absent primitive: zero affected rows means an
                // unresolved alert already holds the key.
                let inserted = diesel::insert_into(alerts::table)
                    .values(&row)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(inserted > 0)
            })
            .await
    }

    async fn set_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Alert> {
        let alert_id = alert_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Alert> {
                let affected = diesel::update(alerts::table.find(&alert_id))
                    .set((
                        alerts::status.eq(status.as_str()),
                        alerts::resolved_at
                            .eq(resolved_at.as_ref().map(format_timestamp)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!("alert {alert_id}")));
                }
                alerts::table
                    .find(&alert_id)
                    .first::<AlertDB>(conn)
                    .map_err(StorageError::from)?
                    .into_domain()
            })
            .await
    }
}
