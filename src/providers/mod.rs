//! Provider abstractions over the hosted embedding, vector index, and LLM services
//!
//! Each concern is a trait with a single HTTP-backed implementation: the
//! HuggingFace Inference API for embeddings, Pinecone for vector storage and
//! search, and Groq's OpenAI-compatible endpoint for answer generation.

pub mod embedding;
pub mod groq;
pub mod huggingface;
pub mod llm;
pub mod pinecone;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use groq::GroqChat;
pub use huggingface::HfInferenceEmbedder;
pub use llm::LlmProvider;
pub use pinecone::PineconeIndex;
pub use vector_index::{ScoredChunk, VectorIndexProvider};
