//! medirag: medical document Q&A over hosted retrieval and generation services
//!
//! PDF documents are chunked, embedded through a hosted embedding API, and
//! upserted into a managed vector index. At query time the question is
//! embedded, the index is asked for its nearest chunks, and a hosted LLM is
//! prompted with the retrieved text to produce a source-grounded answer.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    chat::{ChatRequest, ChatResponse, SourceRef},
    document::{Chunk, ChunkSource, Document},
};

#[cfg(test)]
pub(crate) mod testing;
