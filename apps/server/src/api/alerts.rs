use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use spendguard_core::alerts::{Alert, AlertStatus, BudgetCheckSummary};

use crate::{api::shared::Owner, error::ApiResult, main_lib::AppState};

#[derive(serde::Deserialize)]
struct AlertListQuery {
    status: Option<AlertStatus>,
}

async fn list_alerts(
    Query(query): Query<AlertListQuery>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Vec<Alert>>> {
    let alerts = state.alert_service.list_alerts(&user_id, query.status)?;
    Ok(Json(alerts))
}

/// Triggered by the scheduler or a client retry; idempotent per period, so
/// calling it repeatedly is always safe.
async fn check_budgets(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<BudgetCheckSummary>> {
    let summary = state
        .alert_service
        .check_budgets(&user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

async fn acknowledge_alert(
    Path(alert_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Alert>> {
    let alert = state.alert_service.acknowledge(&user_id, &alert_id).await?;
    Ok(Json(alert))
}

async fn resolve_alert(
    Path(alert_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Alert>> {
    let alert = state.alert_service.resolve(&user_id, &alert_id).await?;
    Ok(Json(alert))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/alerts", get(list_alerts))
        .route("/alerts/check-budgets", post(check_budgets))
        .route("/alerts/{id}/acknowledge", put(acknowledge_alert))
        .route("/alerts/{id}/resolve", put(resolve_alert))
}
