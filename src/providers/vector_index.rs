//! Vector index provider trait for the hosted vector database

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::error::Result;
use crate::types::Chunk;

/// A match returned by the hosted index, reconstructed from vector metadata
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Chunk text
    pub content: String,
    /// Source filename
    pub filename: String,
    /// Page number (if known)
    pub page_number: Option<u32>,
    /// Similarity score (0.0-1.0, higher is more similar)
    pub score: f32,
}

/// Trait for the hosted vector index
///
/// Covers both the data plane (upsert, query) and the lifecycle operations
/// the indexing pipeline needs (create, delete, readiness).
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Upsert embedded chunks, returning the number of vectors written
    async fn upsert(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Query for the nearest chunks to an embedding
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Create the index with the given dimensionality
    async fn create_index(&self, dimensions: usize) -> Result<()>;

    /// Delete the index
    async fn delete_index(&self) -> Result<()>;

    /// Check whether the index exists
    async fn index_exists(&self) -> Result<bool>;

    /// Block until the index reports ready, or time out
    async fn wait_until_ready(&self, timeout: Duration) -> Result<()>;

    /// Total number of vectors stored
    async fn vector_count(&self) -> Result<usize>;

    /// Check if the service is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
