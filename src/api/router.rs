use axum::{
    http::Uri,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::types::{ApiError, Json};
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Versioned API
        .nest("/v1", v1::create_v1_router())
        // Unversioned aliases for existing clients
        .route("/", get(root_status).post(v1::query::answer_query))
        .route("/analytics", get(v1::analytics::get_analytics))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root_status() -> impl IntoResponse {
    Json(json!({ "status": "Response cache running" }))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::embedding::MockEmbedder;
    use crate::domain::generator::MockGenerator;
    use crate::domain::{CacheConfig, Fingerprint};
    use crate::infrastructure::services::QueryService;

    fn app_with(generator: MockGenerator) -> Router {
        let service = QueryService::builder(Arc::new(generator))
            .config(CacheConfig::new().with_embedding_dimensions(8))
            .embedder(Arc::new(MockEmbedder::new(8)))
            .build()
            .unwrap();

        create_router_with_state(AppState::new(Arc::new(service)))
    }

    fn app() -> Router {
        app_with(MockGenerator::new())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_query_miss_then_hit() {
        let app = app();
        let body = serde_json::json!({ "query": "hello", "application": "docs" });

        let resp = app.clone().oneshot(post_json("/v1/query", body.clone())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let first = body_json(resp).await;
        assert_eq!(first["answer"], "Answer to: hello");
        assert_eq!(first["cached"], false);
        assert_eq!(first["cacheKey"], Fingerprint::from_query("hello").as_str());
        assert!(first["latency"].is_u64());

        let resp = app.oneshot(post_json("/v1/query", body)).await.unwrap();
        let second = body_json(resp).await;
        assert_eq!(second["cached"], true);
        assert_eq!(second["cacheKey"], first["cacheKey"]);
    }

    #[tokio::test]
    async fn test_root_post_alias_shares_cache() {
        let app = app();

        app.clone()
            .oneshot(post_json("/", serde_json::json!({ "query": "hello" })))
            .await
            .unwrap();
        let resp = app
            .oneshot(post_json("/v1/query", serde_json::json!({ "query": " hello " })))
            .await
            .unwrap();

        assert_eq!(body_json(resp).await["cached"], true);
    }

    #[tokio::test]
    async fn test_root_get_status() {
        let resp = app().oneshot(get_request("/")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "Response cache running");
    }

    #[tokio::test]
    async fn test_analytics_after_queries() {
        let app = app();

        for query in ["a", "b", "a"] {
            app.clone()
                .oneshot(post_json("/v1/query", serde_json::json!({ "query": query })))
                .await
                .unwrap();
        }

        for uri in ["/v1/analytics", "/analytics"] {
            let resp = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);

            let json = body_json(resp).await;
            assert_eq!(json["totalRequests"], 3);
            assert_eq!(json["cacheHits"], 1);
            assert_eq!(json["cacheMisses"], 2);
            assert_eq!(json["cacheSize"], 2);
            assert_eq!(json["hitRate"], 0.33);
            assert_eq!(json["savingsPercent"], 33.33);
            assert_eq!(json["strategies"].as_array().unwrap().len(), 4);
        }
    }

    #[tokio::test]
    async fn test_analytics_with_no_requests() {
        let resp = app().oneshot(get_request("/v1/analytics")).await.unwrap();
        let json = body_json(resp).await;

        assert_eq!(json["totalRequests"], 0);
        assert_eq!(json["hitRate"], 0.0);
        assert_eq!(json["costSavings"], 0.0);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_json_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/query")
            .header("content-type", "application/json")
            .body(Body::from("{\"query\":"))
            .unwrap();

        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert_eq!(json["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_bad_gateway() {
        let app = app_with(MockGenerator::new().with_error("model overloaded"));

        let resp = app
            .oneshot(post_json("/v1/query", serde_json::json!({ "query": "hello" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["type"], "upstream_error");
        assert_eq!(json["error"]["message"], "mock: model overloaded");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();

        let resp = app.clone().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "healthy");

        let resp = app.clone().oneshot(get_request("/live")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["checks"][0]["name"], "response_cache");
        assert_eq!(json["checks"][0]["entries"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let resp = app().oneshot(get_request("/v2/query")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "req-123");
    }
}
