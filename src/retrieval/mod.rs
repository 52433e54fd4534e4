//! Query-time retrieval: embed the question, search the hosted index

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, ScoredChunk, VectorIndexProvider};

/// Retrieves the chunks most similar to a question
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        Self { embedder, index }
    }

    /// Embed the question and query the index for the top-k chunks
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let embedding = self.embedder.embed(question).await?;
        let matches = self.index.query(&embedding, top_k).await?;
        tracing::debug!(
            question_len = question.len(),
            matches = matches.len(),
            top_k,
            "Retrieved chunks"
        );
        Ok(matches)
    }

    /// The embedder backing this retriever
    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    /// The index backing this retriever
    pub fn index(&self) -> &dyn VectorIndexProvider {
        self.index.as_ref()
    }
}
