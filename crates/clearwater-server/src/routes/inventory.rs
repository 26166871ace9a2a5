use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/", get(list_inventory))
}

#[derive(Debug, Deserialize)]
struct InventoryQuery {
    q: Option<String>,
}

async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let data = match query.q.as_deref() {
        Some(q) => state.inventory.search(q).await?,
        None => state.inventory.records().await?,
    };
    Ok(Json(json!({ "data": data })))
}
