use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use spendguard_core::automations::ExecutedAction;
use spendguard_core::ledger::{LedgerEntry, NewLedgerEntry};

use crate::{api::shared::Owner, error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestResponse {
    entry: LedgerEntry,
    executed_actions: Vec<ExecutedAction>,
}

/// Ingestion webhook called by the account-linking pipeline once per new
/// transaction: persists the entry, then runs the automation rules for it.
async fn ingest_entry(
    State(state): State<Arc<AppState>>,
    Owner(user_id): Owner,
    Json(new_entry): Json<NewLedgerEntry>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let entry = state
        .ledger_repository
        .insert_entry(&user_id, new_entry)
        .await?;
    let executed_actions = state.automation_service.evaluate_entry(&entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            entry,
            executed_actions,
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ledger/entries", post(ingest_entry))
}
