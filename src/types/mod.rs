//! Core data types

pub mod chat;
pub mod document;

pub use chat::{ChatRequest, ChatResponse, SourceRef};
pub use document::{Chunk, ChunkSource, Document};
