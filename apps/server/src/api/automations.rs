use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use spendguard_core::automations::{AutomationRule, NewAutomationRule, RuleUpdate};

use crate::{api::shared::Owner, error::ApiResult, main_lib::AppState};

async fn list_rules(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Vec<AutomationRule>>> {
    let rules = state.automation_service.get_rules(&user_id)?;
    Ok(Json(rules))
}

async fn create_rule(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
    Json(new_rule): Json<NewAutomationRule>,
) -> ApiResult<(StatusCode, Json<AutomationRule>)> {
    let created = state
        .automation_service
        .create_rule(&user_id, new_rule)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// The body's `version` is the optimistic-concurrency token: it must match
/// the stored rule or the edit is rejected with a conflict.
async fn update_rule(
    Path(rule_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
    Json(update): Json<RuleUpdate>,
) -> ApiResult<Json<AutomationRule>> {
    let updated = state
        .automation_service
        .update_rule(&user_id, &rule_id, update)
        .await?;
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/automations", get(list_rules).post(create_rule))
        .route("/automations/{id}", patch(update_rule))
}
