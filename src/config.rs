//! Configuration for the RAG system
//!
//! Settings load from an optional TOML file; API keys for the hosted services
//! are always taken from the environment (`PINECONE_API_KEY`,
//! `HUGGINGFACE_API_KEY`, `GROQ_API_KEY`), never from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Document ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding API configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// LLM API configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Hosted vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load from a file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// Read a required API key from the environment
pub fn require_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "Environment variable {} is not set",
            var
        ))),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Document ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned for PDF files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Minimum chunk size (smaller chunks are dropped)
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    20
}

fn default_min_chunk_size() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chunk_size: default_min_chunk_size(),
        }
    }
}

/// Embedding API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Inference API base URL
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Embedding dimensions (384 for all-MiniLM-L6-v2)
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Batch size for bulk embedding requests
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_batch_size() -> usize {
    32
}

fn default_api_timeout_secs() -> u64 {
    60
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimensions: default_dimensions(),
            batch_size: default_batch_size(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

/// LLM API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Generation model name
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

/// Hosted vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Control plane base URL
    #[serde(default = "default_control_url")]
    pub control_url: String,
    /// Index name
    #[serde(default = "default_index_name")]
    pub name: String,
    /// Namespace within the index
    #[serde(default)]
    pub namespace: String,
    /// Distance metric
    #[serde(default = "default_metric")]
    pub metric: String,
    /// Serverless cloud provider
    #[serde(default = "default_cloud")]
    pub cloud: String,
    /// Serverless region
    #[serde(default = "default_region")]
    pub region: String,
    /// Number of chunks to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Request timeout in seconds
    #[serde(default = "default_index_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_control_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_index_name() -> String {
    "medical-chatbot".to_string()
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_top_k() -> usize {
    2
}

fn default_index_timeout_secs() -> u64 {
    30
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            control_url: default_control_url(),
            name: default_index_name(),
            namespace: String::new(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
            top_k: default_top_k(),
            timeout_secs: default_index_timeout_secs(),
        }
    }
}
