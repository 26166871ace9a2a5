use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use clearwater_rag::data::{summarize, InventoryAnalytics};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data", get(chart_data))
        .route("/analytics", get(chart_analytics))
}

async fn chart_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let records = state.inventory.records().await?;
    Ok(Json(json!({ "summary": summarize(&records) })))
}

async fn chart_analytics(
    State(state): State<AppState>,
) -> Result<Json<InventoryAnalytics>, ApiError> {
    Ok(Json(state.inventory.analytics().await?))
}
