use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use spendguard_core::{
    alerts::{AlertRepositoryTrait, AlertService, AlertServiceTrait},
    automations::{
        ActionDispatcherTrait, AutomationRuleRepositoryTrait, AutomationService,
        AutomationServiceTrait,
    },
    budgets::{BudgetRepositoryTrait, BudgetService, BudgetServiceTrait},
    ledger::LedgerRepositoryTrait,
    spending::{SpendingService, SpendingServiceTrait},
};
use spendguard_storage_sqlite::{
    alerts::AlertRepository,
    automations::{AutomationRuleRepository, SqliteActionDispatcher},
    budgets::BudgetRepository,
    db,
    ledger::LedgerRepository,
};

use crate::config::Config;

pub struct AppState {
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub spending_service: Arc<dyn SpendingServiceTrait>,
    pub alert_service: Arc<dyn AlertServiceTrait>,
    pub automation_service: Arc<dyn AutomationServiceTrait>,
    pub ledger_repository: Arc<dyn LedgerRepositoryTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.as_ref().clone());

    let budget_repository: Arc<dyn BudgetRepositoryTrait> =
        Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let ledger_repository: Arc<dyn LedgerRepositoryTrait> =
        Arc::new(LedgerRepository::new(pool.clone(), writer.clone()));
    let alert_repository: Arc<dyn AlertRepositoryTrait> =
        Arc::new(AlertRepository::new(pool.clone(), writer.clone()));
    let rule_repository: Arc<dyn AutomationRuleRepositoryTrait> =
        Arc::new(AutomationRuleRepository::new(pool.clone(), writer.clone()));
    let dispatcher: Arc<dyn ActionDispatcherTrait> =
        Arc::new(SqliteActionDispatcher::new(pool.clone(), writer.clone()));

    let spending_service: Arc<dyn SpendingServiceTrait> =
        Arc::new(SpendingService::new(ledger_repository.clone()));
    let budget_service: Arc<dyn BudgetServiceTrait> =
        Arc::new(BudgetService::new(budget_repository.clone()));
    let alert_service: Arc<dyn AlertServiceTrait> = Arc::new(AlertService::new(
        budget_repository,
        spending_service.clone(),
        alert_repository,
    ));
    let automation_service: Arc<dyn AutomationServiceTrait> =
        Arc::new(AutomationService::new(rule_repository, dispatcher));

    Ok(Arc::new(AppState {
        budget_service,
        spending_service,
        alert_service,
        automation_service,
        ledger_repository,
    }))
}
