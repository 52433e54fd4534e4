//! Chat request and response types

use serde::{Deserialize, Serialize};

use crate::providers::vector_index::ScoredChunk;

/// Chat request for the JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Number of chunks to retrieve (default: 2)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    2
}

impl ChatRequest {
    /// Create a new request with the default retrieval depth
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            top_k: default_top_k(),
        }
    }
}

/// A retrieved source backing the answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source filename
    pub filename: String,
    /// Page number (if known)
    pub page_number: Option<u32>,
    /// Similarity score (0.0-1.0)
    pub score: f32,
    /// Short excerpt from the retrieved chunk
    pub snippet: String,
}

/// Longest snippet returned with a source reference
const SNIPPET_LEN: usize = 200;

impl SourceRef {
    /// Build a source reference from a retrieved chunk
    pub fn from_match(m: &ScoredChunk) -> Self {
        let snippet = if m.content.chars().count() > SNIPPET_LEN {
            let cut: String = m.content.chars().take(SNIPPET_LEN).collect();
            format!("{}…", cut.trim_end())
        } else {
            m.content.clone()
        };

        Self {
            filename: m.filename.clone(),
            page_number: m.page_number,
            score: m.score,
            snippet,
        }
    }
}

/// Response from a chat query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer
    pub answer: String,
    /// Sources the answer was grounded on
    pub sources: Vec<SourceRef>,
    /// Number of chunks retrieved from the index
    pub chunks_retrieved: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ChatResponse {
    /// Create a new chat response
    pub fn new(
        answer: String,
        sources: Vec<SourceRef>,
        chunks_retrieved: usize,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            answer,
            sources,
            chunks_retrieved,
            processing_time_ms,
        }
    }

    /// Response for when retrieval returned nothing relevant
    pub fn not_found(processing_time_ms: u64) -> Self {
        Self {
            answer: "I couldn't find relevant information in the indexed documents to answer \
                     this question."
                .to_string(),
            sources: Vec::new(),
            chunks_retrieved: 0,
            processing_time_ms,
        }
    }

    /// Response answered without retrieval (canned small talk)
    pub fn canned(answer: &str, processing_time_ms: u64) -> Self {
        Self {
            answer: answer.to_string(),
            sources: Vec::new(),
            chunks_retrieved: 0,
            processing_time_ms,
        }
    }
}
