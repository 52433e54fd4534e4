//! In-memory provider stubs shared across unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::error::Result;
use crate::providers::{
    EmbeddingProvider, LlmProvider, ScoredChunk, VectorIndexProvider,
};
use crate::types::Chunk;

/// Deterministic embedder returning fixed-dimension vectors
pub(crate) struct StubEmbedder {
    dimensions: usize,
}

impl StubEmbedder {
    pub(crate) fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Vary the first component so different texts embed differently
        let mut v = vec![0.1; self.dimensions];
        if let Some(first) = v.first_mut() {
            *first = (text.len() % 97) as f32 / 97.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-embedder"
    }
}

/// In-memory index holding seeded matches and counting upserts
pub(crate) struct StubIndex {
    matches: Mutex<Vec<ScoredChunk>>,
    upserted: Mutex<Vec<Chunk>>,
    exists: Mutex<bool>,
}

impl StubIndex {
    pub(crate) fn new() -> Self {
        Self {
            matches: Mutex::new(Vec::new()),
            upserted: Mutex::new(Vec::new()),
            exists: Mutex::new(true),
        }
    }

    pub(crate) fn seed_match(
        &self,
        filename: &str,
        page_number: Option<u32>,
        content: &str,
        score: f32,
    ) {
        self.matches.lock().push(ScoredChunk {
            chunk_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            content: content.to_string(),
            filename: filename.to_string(),
            page_number,
            score,
        });
    }

    pub(crate) fn upserted_count(&self) -> usize {
        self.upserted.lock().len()
    }
}

#[async_trait]
impl VectorIndexProvider for StubIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<usize> {
        self.upserted.lock().extend_from_slice(chunks);
        Ok(chunks.len())
    }

    async fn query(&self, _embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let mut matches = self.matches.lock().clone();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn create_index(&self, _dimensions: usize) -> Result<()> {
        *self.exists.lock() = true;
        Ok(())
    }

    async fn delete_index(&self) -> Result<()> {
        *self.exists.lock() = false;
        self.matches.lock().clear();
        self.upserted.lock().clear();
        Ok(())
    }

    async fn index_exists(&self) -> Result<bool> {
        Ok(*self.exists.lock())
    }

    async fn wait_until_ready(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn vector_count(&self) -> Result<usize> {
        Ok(self.upserted.lock().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-index"
    }
}

/// LLM stub echoing the question and context lengths
pub(crate) struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        Ok(format!(
            "Answer to '{}' from {} characters of context.",
            question,
            context.len()
        ))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub-llm"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
