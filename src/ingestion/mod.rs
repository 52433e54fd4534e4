//! Document ingestion: PDF loading, chunking, and the indexing pipeline

pub mod chunker;
pub mod loader;
pub mod pipeline;

pub use chunker::TextChunker;
pub use loader::{LoadedPdf, PdfLoader, PdfPage};
pub use pipeline::{IndexPipeline, IndexSummary};
