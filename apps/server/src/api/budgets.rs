use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};

use spendguard_core::budgets::{Budget, BudgetUpdate, NewBudget};
use spendguard_core::spending::{BudgetSpending, BudgetSpendingDetail};

use crate::{
    api::shared::Owner,
    error::ApiResult,
    main_lib::AppState,
};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsOfQuery {
    /// Optional override for "now", mainly for clients showing past periods.
    as_of: Option<NaiveDate>,
}

impl AsOfQuery {
    fn resolve(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = state.budget_service.get_budgets(&user_id)?;
    Ok(Json(budgets))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
    Json(new_budget): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let created = state.budget_service.create_budget(&user_id, new_budget).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_budget(
    Path(budget_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
    Json(update): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    let updated = state
        .budget_service
        .update_budget(&user_id, &budget_id, update)
        .await?;
    Ok(Json(updated))
}

async fn deactivate_budget(
    Path(budget_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .deactivate_budget(&user_id, &budget_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_spending(
    Query(query): Query<AsOfQuery>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<Vec<BudgetSpending>>> {
    let budgets = state.budget_service.get_active_budgets(&user_id)?;
    let rows = state
        .spending_service
        .summarize(&user_id, &budgets, query.resolve())?;
    Ok(Json(rows))
}

async fn get_budget_spending(
    Path(budget_id): Path<String>,
    Query(query): Query<AsOfQuery>,
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
) -> ApiResult<Json<BudgetSpendingDetail>> {
    let budget = state.budget_service.get_budget(&user_id, &budget_id)?;
    let detail = state
        .spending_service
        .summarize_budget(&user_id, &budget, query.resolve())?;
    Ok(Json(detail))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/spending", get(get_spending))
        .route("/budgets/{id}", put(update_budget).delete(deactivate_budget))
        .route("/budgets/{id}/spending", get(get_budget_spending))
}
