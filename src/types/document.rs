//! Document and chunk types with source tracking

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A PDF document that has been ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Filename as found on disk
    pub filename: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Total number of pages
    pub total_pages: Option<u32>,
    /// File size in bytes
    pub file_size: u64,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(filename: String, content_hash: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            content_hash,
            total_pages: None,
            file_size,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// Source information for a chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Filename the chunk came from
    pub filename: String,
    /// Page number (1-indexed)
    pub page_number: Option<u32>,
    /// Total pages in the document
    pub page_count: Option<u32>,
}

impl ChunkSource {
    /// Create source info for a page of a PDF
    pub fn pdf(filename: String, page: u32, total_pages: Option<u32>) -> Self {
        Self {
            filename,
            page_number: Some(page),
            page_count: total_pages,
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector, filled in by the pipeline before upsert
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source information
    pub source: ChunkSource,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk (embedding is attached later)
    pub fn new(document_id: Uuid, content: String, source: ChunkSource, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            embedding: Vec::new(),
            source,
            chunk_index,
        }
    }

    /// Metadata stored alongside the vector in the hosted index.
    ///
    /// The chunk text rides in metadata so query results can be turned back
    /// into readable context without a local chunk store.
    pub fn to_index_metadata(&self) -> serde_json::Value {
        let mut meta = serde_json::Map::new();
        meta.insert("text".into(), serde_json::json!(self.content));
        meta.insert("filename".into(), serde_json::json!(self.source.filename));
        meta.insert(
            "document_id".into(),
            serde_json::json!(self.document_id.to_string()),
        );
        meta.insert("chunk_index".into(), serde_json::json!(self.chunk_index));
        if let Some(page) = self.source.page_number {
            meta.insert("page_number".into(), serde_json::json!(page));
        }
        serde_json::Value::Object(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk() -> Chunk {
        Chunk::new(
            Uuid::new_v4(),
            "Acetaminophen is an analgesic.".to_string(),
            ChunkSource::pdf("pharmacology.pdf".to_string(), 12, Some(340)),
            3,
        )
    }

    #[test]
    fn test_new_chunk_has_no_embedding() {
        let chunk = sample_chunk();
        assert!(chunk.embedding.is_empty());
        assert_eq!(chunk.chunk_index, 3);
    }

    #[test]
    fn test_index_metadata_carries_text_and_source() {
        let chunk = sample_chunk();
        let meta = chunk.to_index_metadata();
        assert_eq!(meta["text"], "Acetaminophen is an analgesic.");
        assert_eq!(meta["filename"], "pharmacology.pdf");
        assert_eq!(meta["page_number"], 12);
        assert_eq!(meta["document_id"], chunk.document_id.to_string());
    }

    #[test]
    fn test_index_metadata_omits_missing_page() {
        let mut chunk = sample_chunk();
        chunk.source.page_number = None;
        let meta = chunk.to_index_metadata();
        assert!(meta.get("page_number").is_none());
    }

}
