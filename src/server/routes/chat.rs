//! Chat handlers
//!
//! Two surfaces over the same pipeline: a JSON API at `/api/chat` and a
//! form endpoint at `/get` that returns the bare answer for the embedded
//! chat page.

use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use std::time::Instant;

use crate::error::Result;
use crate::generation::{check_common_question, PromptBuilder};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse, SourceRef};

/// Form payload posted by the chat page
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub msg: String,
}

/// JSON chat endpoint
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let response = answer_message(&state, &request.message, request.top_k).await?;
    Ok(Json(response))
}

/// Form chat endpoint, replies with the answer as plain text
pub async fn chat_form(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<String> {
    let top_k = state.config().index.top_k;
    let response = answer_message(&state, &form.msg, top_k).await?;
    Ok(response.answer)
}

/// Answer one message through the retrieval pipeline
async fn answer_message(state: &AppState, message: &str, top_k: usize) -> Result<ChatResponse> {
    let started = Instant::now();
    let message = message.trim();

    if message.is_empty() {
        return Ok(ChatResponse::canned(
            "Please enter a question.",
            elapsed_ms(started),
        ));
    }

    // Small talk short-circuits retrieval entirely
    if let Some(reply) = check_common_question(message) {
        tracing::debug!("Answered with canned reply");
        return Ok(ChatResponse::canned(reply, elapsed_ms(started)));
    }

    let matches = state.retriever().retrieve(message, top_k).await?;
    if matches.is_empty() {
        tracing::debug!("No matches retrieved");
        return Ok(ChatResponse::not_found(elapsed_ms(started)));
    }

    let context = PromptBuilder::new().build_context(&matches);
    let answer = state.llm().generate_answer(message, &context).await?;

    let sources: Vec<SourceRef> = matches.iter().map(SourceRef::from_match).collect();
    tracing::info!(
        chunks = matches.len(),
        elapsed_ms = elapsed_ms(started),
        "Answered question"
    );

    Ok(ChatResponse::new(
        answer,
        sources,
        matches.len(),
        elapsed_ms(started),
    ))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
