use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::health;
use super::rag;
use super::state::AppState;

/// Ops router: probes plus the retrieval endpoints under `/api/rag`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/rag", rag::create_rag_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::knowledge_base::Document;
    use crate::infrastructure::embedding::Embedder;
    use crate::infrastructure::knowledge_base::InMemoryKnowledgeBase;
    use crate::infrastructure::services::RetrievalOrchestrator;
    use crate::infrastructure::vector_store::LocalVectorStore;

    fn state(dir: &TempDir) -> AppState {
        let documents = vec![
            Document::new("visa_us", "USA B1/B2 visa fee $185")
                .with_metadata("country", "USA")
                .with_metadata("type", "visa_info"),
            Document::new("visa_uk", "UK Standard Visitor visa costs 115 GBP.")
                .with_metadata("country", "UK")
                .with_metadata("type", "visa_info"),
        ];
        let orchestrator = RetrievalOrchestrator::new(
            Arc::new(InMemoryKnowledgeBase::new(documents)),
            Embedder::local(16),
            LocalVectorStore::open(dir.path().join("rag_cache.json")),
        );
        AppState::new(Arc::new(orchestrator))
    }

    async fn ready_state(dir: &TempDir) -> AppState {
        let state = state(dir);
        assert!(state.orchestrator.initialize().await);
        state
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_live() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir));

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = app.oneshot(get("/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_unavailable_before_initialize() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir));

        let response = app.oneshot(get("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_ready_degraded_without_remote() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app.oneshot(get("/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"][1]["name"], "remote_index");
    }

    #[tokio::test]
    async fn test_status() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app.oneshot(get("/api/rag/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["initialized"], true);
        assert_eq!(body["documents_indexed"], 2);
        assert_eq!(body["using_fallback_embeddings"], true);
        assert_eq!(body["cache_stats"]["total_documents"], 2);
    }

    #[tokio::test]
    async fn test_search_with_filter() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app
            .oneshot(post_json(
                "/api/rag/search",
                json!({"query": "US visa cost", "country": "USA", "top_k": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "cache");
        assert_eq!(body["count"], 1);
        assert_eq!(body["sources"], json!(["USA"]));
        assert_eq!(body["documents"][0]["type"], "visa_info");
        assert_eq!(body["documents"][0]["content"], "USA B1/B2 visa fee $185");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app
            .oneshot(post_json("/api/rag/search", json!({"query": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["param"], "query");
    }

    #[tokio::test]
    async fn test_search_rejects_malformed_body() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app
            .oneshot(post_json("/api/rag/search", json!({"country": "USA"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_search_before_initialize_is_empty() {
        let dir = TempDir::new().unwrap();
        let app = create_router(state(&dir));

        let response = app
            .oneshot(post_json("/api/rag/search", json!({"query": "US visa cost"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "none");
        assert_eq!(body["documents"], json!([]));
    }

    #[tokio::test]
    async fn test_validate_report() {
        let dir = TempDir::new().unwrap();
        let app = create_router(ready_state(&dir).await);

        let response = app
            .oneshot(Request::builder().method("POST").uri("/api/rag/validate").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["validation_suite"]["total_tests"], 10);
        assert_eq!(body["filter_tests"]["filter_tests"].as_array().unwrap().len(), 2);
        assert!(body["timestamp"].is_string());
    }
}
