//! Alerts module - durable alerts and the budget-exceed evaluator.

mod alerts_model;
mod alerts_service;
mod alerts_traits;

pub use alerts_model::{
    Alert, AlertKind, AlertSeverity, AlertStatus, BudgetCheckSummary, NewAlert,
};
pub use alerts_service::AlertService;
pub use alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
