//! API route handlers

pub mod chat;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::Result;
use crate::server::state::AppState;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/info", get(info))
}

/// System information: models in use and index statistics
async fn info(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let config = state.config();
    let vector_count = state.retriever().index().vector_count().await.ok();

    Ok(Json(serde_json::json!({
        "embedding_model": config.embeddings.model,
        "embedding_dimensions": config.embeddings.dimensions,
        "llm_model": state.llm().model(),
        "index_name": config.index.name,
        "top_k": config.index.top_k,
        "vector_count": vector_count,
    })))
}
