//! Alert domain models.
//!
//! Alerts are the one piece of derived state that is persisted: they must
//! survive across requests and must never be recreated redundantly for the
//! same budget period.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Alert families raised by the dashboard. The budget core only raises
/// `Budget`; fraud and cashflow alerts come from their own pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Budget,
    Fraud,
    Cashflow,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Budget => "budget",
            AlertKind::Fraud => "fraud",
            AlertKind::Cashflow => "cashflow",
        }
    }
}

impl FromStr for AlertKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "budget" => Ok(AlertKind::Budget),
            "fraud" => Ok(AlertKind::Fraud),
            "cashflow" => Ok(AlertKind::Cashflow),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown alert kind '{other}'"
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warn,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warn => "warn",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(AlertSeverity::Info),
            "warn" => Ok(AlertSeverity::Warn),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown alert severity '{other}'"
            )))),
        }
    }
}

/// Lifecycle of an alert: `new -> acknowledged -> resolved`, or straight to
/// `resolved`. Resolved is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "new",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Applies a requested transition. Invalid or repeated transitions are
    /// no-ops that keep the current status, so resolving twice is idempotent
    /// and a resolved alert never leaves its terminal state.
    pub fn apply(self, requested: AlertStatus) -> AlertStatus {
        match (self, requested) {
            (AlertStatus::Resolved, _) => AlertStatus::Resolved,
            (_, AlertStatus::Resolved) => AlertStatus::Resolved,
            (AlertStatus::New, AlertStatus::Acknowledged) => AlertStatus::Acknowledged,
            (current, _) => current,
        }
    }
}

impl FromStr for AlertStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(AlertStatus::New),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown alert status '{other}'"
            )))),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub user_id: String,
    pub kind: AlertKind,
    pub budget_id: Option<String>,
    /// Start date of the period the alert was raised for; the
    /// `(budget_id, period_start)` pair keys budget-alert uniqueness.
    pub period_start: Option<NaiveDate>,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: Option<String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Input model for the conditional alert insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub user_id: String,
    pub kind: AlertKind,
    pub budget_id: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: Option<String>,
}

/// Outcome of one `check_budgets` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheckSummary {
    pub alerts_created: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_idempotent_and_terminal() {
        assert_eq!(
            AlertStatus::New.apply(AlertStatus::Resolved),
            AlertStatus::Resolved
        );
        assert_eq!(
            AlertStatus::Resolved.apply(AlertStatus::Resolved),
            AlertStatus::Resolved
        );
        assert_eq!(
            AlertStatus::Resolved.apply(AlertStatus::Acknowledged),
            AlertStatus::Resolved
        );
        assert_eq!(
            AlertStatus::Resolved.apply(AlertStatus::New),
            AlertStatus::Resolved
        );
    }

    #[test]
    fn acknowledge_only_moves_forward() {
        assert_eq!(
            AlertStatus::New.apply(AlertStatus::Acknowledged),
            AlertStatus::Acknowledged
        );
        // No un-acknowledge.
        assert_eq!(
            AlertStatus::Acknowledged.apply(AlertStatus::New),
            AlertStatus::Acknowledged
        );
    }
}
