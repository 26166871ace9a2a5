use crate::config::HttpSettings;
use crate::state::AppState;
use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod agent;
mod chart;
mod inventory;
mod knowledgebase;
mod s3;

pub fn build_router(state: AppState, config: &HttpSettings) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/agent", agent::router())
        .nest("/s3", s3::router())
        .nest("/knowledgebase", knowledgebase::router())
        .nest("/chart", chart::router())
        .merge(inventory::router())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Clearwater Post Trade Data API is running." }))
}

fn build_cors_layer(config: &HttpSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use clearwater_llm::{ChatMessage, ChatResponse, LlmClient, LlmError, LlmResult};
    use clearwater_rag::agent::memory::{HashEmbeddingProvider, StaticEmbeddingBackend};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct StubLlm {
        reply: Option<String>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl StubLlm {
        fn answering(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat_completion(&self, messages: Vec<ChatMessage>) -> LlmResult<ChatResponse> {
            self.calls.lock().unwrap().push(messages);
            match &self.reply {
                Some(reply) => Ok(ChatResponse::text(reply.clone(), "stub")),
                None => Err(LlmError::api(503, "model overloaded")),
            }
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn fixtures() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("inventory.csv"),
            "Item ID,Item Name,Category,Quantity,Unit Price\n\
             I-1,Hex Bolt,Fasteners,30,0.5\n\
             I-2,Lock Nut,Fasteners,12,0.25\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("knowledgebase.txt"),
            "Settlement happens T+2 for equities.\nTrade breaks are reconciled nightly.\n",
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("objects/reports")).unwrap();
        std::fs::write(dir.path().join("objects/reports/trades.csv"), b"id,qty\n1,10\n").unwrap();
        dir
    }

    fn app(dir: &TempDir, llm: Arc<StubLlm>) -> Router {
        let mut config = ServerConfig::default();
        config.data.inventory_csv = dir.path().join("inventory.csv");
        config.data.knowledgebase = dir.path().join("knowledgebase.txt");
        config.object_store.root = dir.path().join("objects");

        let embeddings = Arc::new(StaticEmbeddingBackend::new(HashEmbeddingProvider::new(64)));
        let state = AppState::new(llm, embeddings, &config).unwrap();
        build_router(state, &config.http)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_ping() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Clearwater Post Trade Data API is running.");

        let (status, body) = send(&app, get("/agent/ping")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Agent service is alive.");
    }

    #[tokio::test]
    async fn test_query_and_memory_lifecycle() {
        let dir = fixtures();
        let llm = Arc::new(StubLlm::answering("42 units"));
        let app = app(&dir, llm.clone());

        let (status, body) = send(
            &app,
            post_json(
                "/agent/query",
                json!({"session_id": "abc", "query": "What is the total quantity in stock?"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], "42 units");
        assert!(body["response_id"].is_string());

        let (status, body) = send(&app, get("/agent/sessions/abc/memory")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "populated");
        assert_eq!(body["turns"].as_array().unwrap().len(), 2);
        assert_eq!(body["turns"][0]["role"], "user");

        let (status, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/agent/sessions/abc/memory/trim?n=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "trimmed": 2}));

        let (_, body) = send(&app, get("/agent/sessions/abc/memory")).await;
        assert_eq!(body["state"], "empty");

        // trimmed turns remain recallable
        let (status, body) = send(
            &app,
            get("/agent/sessions/abc/recall?query=total%20quantity%20in%20stock&top_k=1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0]["item"]["content"],
            "What is the total quantity in stock?"
        );

        let (status, body) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/agent/sessions/abc/memory")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(llm.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_query_rejections_use_envelope() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(
            &app,
            post_json("/agent/query", json!({"session_id": "abc", "query": " "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["response"].is_string());

        let (status, body) = send(
            &app,
            post_json("/agent/query", json!({"query": "missing session"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_vendor_failure_envelope() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::failing()));

        let (status, body) = send(
            &app,
            post_json("/agent/query", json!({"session_id": "abc", "query": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["response"]
            .as_str()
            .unwrap()
            .contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_feedback() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(
            &app,
            post_json(
                "/agent/feedback",
                json!({"session_id": "abc", "response_id": "r-1", "feedback": "great", "rating": 5}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Feedback received."}));

        let (status, body) = send(
            &app,
            post_json(
                "/agent/feedback",
                json!({"session_id": "abc", "response_id": "r-1", "feedback": "", "rating": 9}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], 400);

        let (status, body) = send(&app, get("/agent/feedback?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        let feedback = body["feedback"].as_array().unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0]["response_id"], "r-1");
        assert_eq!(feedback[0]["rating"], 5);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(&app, get("/agent/sessions/nobody/memory")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Session not found");
    }

    #[tokio::test]
    async fn test_inventory_and_charts() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(&app, get("/inventory/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, get("/inventory/?q=nut")).await;
        assert_eq!(body["data"][0]["Item Name"], "Lock Nut");

        let (status, body) = send(&app, get("/chart/data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["Quantity"]["count"], 2);
        assert_eq!(body["summary"]["Quantity"]["max"], 30.0);

        let (status, body) = send(&app, get("/chart/analytics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_unique_items"], 2);
        assert_eq!(body["total_quantity"], 42.0);
    }

    #[tokio::test]
    async fn test_knowledgebase_search() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let (status, body) = send(&app, get("/knowledgebase/search?query=TRADE")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["results"],
            json!(["Trade breaks are reconciled nightly."])
        );

        let (status, _) = send(&app, get("/knowledgebase/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_s3_download() {
        let dir = fixtures();
        let app = app(&dir, Arc::new(StubLlm::answering("ok")));

        let response = app
            .clone()
            .oneshot(get("/s3/download?s3_path=s3://reports/trades.csv"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"id,qty\n1,10\n");

        let (status, _) = send(&app, get("/s3/download?s3_path=s3://reports/missing.csv")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get("/s3/download?s3_path=reports/../../secret")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/s3/download")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
