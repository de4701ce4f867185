mod dispatcher;
mod model;
mod repository;

pub use dispatcher::SqliteActionDispatcher;
pub use model::{AutomationRuleDB, NewAutomationRuleDB};
pub use repository::AutomationRuleRepository;
