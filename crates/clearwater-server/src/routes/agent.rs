use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use clearwater_rag::agent::memory::{ConversationTurn, MemoryState, SearchResult};
use clearwater_rag::agent::SessionAgent;
use clearwater_rag::service::{
    FeedbackEnvelope, FeedbackRecord, FeedbackRequest, QueryEnvelope, QueryRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/query", post(query_agent))
        .route("/feedback", post(submit_feedback).get(list_feedback))
        .route(
            "/sessions/:session_id/memory",
            get(get_memory).delete(reset_memory),
        )
        .route("/sessions/:session_id/memory/trim", post(trim_memory))
        .route("/sessions/:session_id/recall", get(recall_memory))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "Agent service is alive." }))
}

async fn query_agent(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryEnvelope>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::new(e.status(), e.body_text()).envelope())?;
    let envelope = state
        .query
        .submit_query(&request.session_id, &request.query)
        .await
        .map_err(|e| ApiError::from(e).envelope())?;
    Ok(Json(envelope))
}

async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackEnvelope>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let envelope = state
        .feedback
        .submit_feedback(
            &request.session_id,
            &request.response_id,
            &request.feedback,
            request.rating,
        )
        .await?;
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
struct FeedbackQuery {
    #[serde(default = "default_feedback_limit")]
    limit: usize,
}

fn default_feedback_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
struct FeedbackList {
    feedback: Vec<FeedbackRecord>,
}

async fn list_feedback(
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
) -> Json<FeedbackList> {
    Json(FeedbackList {
        feedback: state.feedback.recent(params.limit),
    })
}

#[derive(Debug, Serialize)]
struct MemoryView {
    session_id: String,
    state: MemoryState,
    turns: Vec<ConversationTurn>,
}

fn session(state: &AppState, session_id: &str) -> Result<Arc<SessionAgent>, ApiError> {
    state
        .registry()
        .get(session_id)
        .ok_or_else(|| ApiError::not_found("Session"))
}

async fn get_memory(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MemoryView>, ApiError> {
    let agent = session(&state, &session_id)?;
    let memory = agent.memory();
    Ok(Json(MemoryView {
        session_id,
        state: memory.state(),
        turns: memory.get_all(),
    }))
}

async fn reset_memory(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let agent = session(&state, &session_id)?;
    agent.reset_memory().await;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
struct TrimQuery {
    #[serde(default = "default_trim")]
    n: usize,
}

fn default_trim() -> usize {
    2
}

async fn trim_memory(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<TrimQuery>,
) -> Result<Json<Value>, ApiError> {
    let agent = session(&state, &session_id)?;
    let success = agent.trim_last(params.n).await;
    let trimmed = if success { params.n } else { 0 };
    Ok(Json(json!({ "success": success, "trimmed": trimmed })))
}

#[derive(Debug, Deserialize)]
struct RecallQuery {
    #[serde(default)]
    query: String,
    top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RecallResponse {
    results: Vec<SearchResult<ConversationTurn>>,
}

async fn recall_memory(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<RecallQuery>,
) -> Result<Json<RecallResponse>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }
    let agent = session(&state, &session_id)?;
    let results = agent
        .memory()
        .try_recall(&params.query, params.top_k)
        .await?;
    Ok(Json(RecallResponse { results }))
}
