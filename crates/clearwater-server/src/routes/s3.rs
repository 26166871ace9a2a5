use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use clearwater_rag::data::ObjectPath;
use serde::Deserialize;
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new().route("/download", get(download_file))
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    s3_path: Option<String>,
}

async fn download_file(
    State(state): State<AppState>,
    Query(params): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = params
        .s3_path
        .ok_or_else(|| ApiError::bad_request("missing query parameter `s3_path`"))?;
    let path = ObjectPath::parse(&raw)?;
    let content = state.objects.get(&path).await?;
    info!(path = %path, bytes = content.len(), "Object downloaded");

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        content,
    ))
}
