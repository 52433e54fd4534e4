//! The indexing pipeline: load, chunk, embed, upsert
//!
//! One failing file does not abort the run; failures are collected and
//! reported in the summary.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{LoadedPdf, PdfLoader, TextChunker};
use crate::providers::{EmbeddingProvider, VectorIndexProvider};
use crate::types::{Chunk, ChunkSource};

/// Outcome of an indexing run
#[derive(Debug, Default)]
pub struct IndexSummary {
    /// Documents successfully indexed
    pub documents: usize,
    /// Chunks produced across all documents
    pub chunks: usize,
    /// Vectors the index confirmed as written
    pub vectors_upserted: usize,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
    /// Files that failed, with the reason
    pub failures: Vec<(String, String)>,
}

/// Drives documents from disk into the hosted index
pub struct IndexPipeline {
    loader: PdfLoader,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    batch_size: usize,
}

impl IndexPipeline {
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        Self {
            loader: PdfLoader::new(),
            chunker: TextChunker::new(&config.chunking),
            embedder,
            index,
            batch_size: config.embeddings.batch_size.max(1),
        }
    }

    /// Index every PDF under `data_dir`
    pub async fn run(&self, data_dir: &Path) -> Result<IndexSummary> {
        let started = Instant::now();
        let files = self.loader.discover(data_dir)?;
        tracing::info!(count = files.len(), dir = %data_dir.display(), "Found PDF files");

        let mut summary = IndexSummary::default();
        for path in &files {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown.pdf")
                .to_string();

            match self.index_file(path).await {
                Ok((chunks, upserted)) => {
                    tracing::info!(filename, chunks, upserted, "Indexed document");
                    summary.documents += 1;
                    summary.chunks += chunks;
                    summary.vectors_upserted += upserted;
                }
                Err(e) => {
                    tracing::warn!(filename, error = %e, "Failed to index document");
                    summary.failures.push((filename, e.to_string()));
                }
            }
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(summary)
    }

    /// Load, chunk, embed, and upsert one file
    async fn index_file(&self, path: &Path) -> Result<(usize, usize)> {
        let loaded = self.loader.load_file(path)?;
        let mut chunks = self.chunk_document(&loaded);
        if chunks.is_empty() {
            tracing::debug!(filename = %loaded.document.filename, "No chunks produced");
            return Ok((0, 0));
        }

        let mut upserted = 0;
        for batch in chunks.chunks_mut(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
            upserted += self.index.upsert(batch).await?;
        }

        Ok((chunks.len(), upserted))
    }

    /// Turn a loaded PDF's pages into chunks with source tracking
    fn chunk_document(&self, loaded: &LoadedPdf) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = 0u32;
        for page in &loaded.pages {
            for text in self.chunker.chunk_text(&page.text) {
                let source = ChunkSource {
                    filename: loaded.document.filename.clone(),
                    page_number: page.number,
                    page_count: loaded.document.total_pages,
                };
                chunks.push(Chunk::new(loaded.document.id, text, source, chunk_index));
                chunk_index += 1;
            }
        }
        chunks
    }
}
