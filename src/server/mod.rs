//! HTTP server: router assembly and startup

pub mod routes;
pub mod state;

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::server::state::AppState;

/// The chat web server
pub struct RagServer {
    state: AppState,
}

impl RagServer {
    /// Create a server backed by the hosted providers
    pub fn new(config: RagConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Create a server from prebuilt state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Assemble the router with all routes and middleware
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/", get(chat_page))
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/get", post(routes::chat::chat_form))
            .nest("/api", routes::api_routes())
            .layer(TraceLayer::new_for_http());

        if self.state.config().server.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router.with_state(self.state.clone())
    }

    /// Bind and serve until shutdown
    pub async fn start(&self) -> Result<()> {
        let config = self.state.config();
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Server listening");
        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// The embedded chat page
async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../../static/chat.html"))
}

async fn health() -> &'static str {
    "OK"
}

/// Readiness probe, 503 until providers have been verified
async fn ready(axum::extract::State(state): axum::extract::State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubEmbedder, StubIndex, StubLlm};
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn stub_server(seed: bool) -> RagServer {
        let index = Arc::new(StubIndex::new());
        if seed {
            index.seed_match(
                "gale.pdf",
                Some(88),
                "Anemia is a shortage of red blood cells.",
                0.9,
            );
        }
        let state = AppState::from_providers(
            RagConfig::default(),
            Arc::new(StubEmbedder::new(384)),
            index,
            Arc::new(StubLlm),
        );
        RagServer::with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = stub_server(false).build_router();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reflects_state() {
        let server = stub_server(false);
        server.state().set_ready(false);
        let response = server
            .build_router()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_chat_page_served_at_root() {
        let router = stub_server(false).build_router();
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<form"));
    }

    #[tokio::test]
    async fn test_api_chat_answers_with_sources() {
        let router = stub_server(true).build_router();
        let response = router
            .oneshot(
                Request::post("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message": "what is anemia?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["answer"].as_str().unwrap().contains("what is anemia?"));
        assert_eq!(json["chunks_retrieved"], 1);
        assert_eq!(json["sources"][0]["filename"], "gale.pdf");
        assert_eq!(json["sources"][0]["page_number"], 88);
    }

    #[tokio::test]
    async fn test_api_chat_empty_index_says_not_found() {
        let router = stub_server(false).build_router();
        let response = router
            .oneshot(
                Request::post("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message": "what is anemia?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["answer"]
            .as_str()
            .unwrap()
            .contains("couldn't find relevant information"));
        assert_eq!(json["chunks_retrieved"], 0);
    }

    #[tokio::test]
    async fn test_api_chat_greeting_skips_retrieval() {
        let router = stub_server(true).build_router();
        let response = router
            .oneshot(
                Request::post("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["answer"].as_str().unwrap().contains("Hello"));
        assert_eq!(json["chunks_retrieved"], 0);
        assert!(json["sources"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_form_endpoint_returns_plain_answer() {
        let router = stub_server(true).build_router();
        let response = router
            .oneshot(
                Request::post("/get")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("msg=what+is+anemia%3F"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let answer = String::from_utf8_lossy(&bytes);
        assert!(answer.contains("what is anemia?"));
    }

    #[tokio::test]
    async fn test_api_info_reports_models() {
        let router = stub_server(false).build_router();
        let response = router
            .oneshot(Request::get("/api/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json["embedding_model"],
            "sentence-transformers/all-MiniLM-L6-v2"
        );
        assert_eq!(json["llm_model"], "stub-model");
        assert_eq!(json["index_name"], "medical-chatbot");
        assert_eq!(json["top_k"], 2);
    }
}
