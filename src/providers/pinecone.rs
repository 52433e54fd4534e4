//! Pinecone serverless vector index provider
//!
//! Talks to two surfaces: the control plane (`https://api.pinecone.io`) for
//! index lifecycle, and the per-index data plane host (discovered from the
//! index description) for upsert and query. Chunk text and source fields ride
//! in vector metadata, so query results can be rebuilt without a local store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::Duration;
use uuid::Uuid;

use crate::config::{require_env, IndexConfig};
use crate::error::{Error, Result};
use crate::providers::vector_index::{ScoredChunk, VectorIndexProvider};
use crate::types::Chunk;

/// Environment variable holding the API key
pub const PINECONE_API_KEY_ENV: &str = "PINECONE_API_KEY";

/// Pinned API version sent with every request
const API_VERSION: &str = "2024-07";

/// Pinecone index client
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    control_url: String,
    index_name: String,
    namespace: String,
    metric: String,
    cloud: String,
    region: String,
    /// Data plane host, cached after the first describe call
    host: RwLock<Option<String>>,
}

impl PineconeIndex {
    /// Create a new index client with an explicit API key
    pub fn new(api_key: String, config: &IndexConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            control_url: config.control_url.clone(),
            index_name: config.name.clone(),
            namespace: config.namespace.clone(),
            metric: config.metric.clone(),
            cloud: config.cloud.clone(),
            region: config.region.clone(),
            host: RwLock::new(None),
        }
    }

    /// Create a new index client, reading the API key from the environment
    pub fn from_env(config: &IndexConfig) -> Result<Self> {
        Ok(Self::new(require_env(PINECONE_API_KEY_ENV)?, config))
    }

    /// The configured index name
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
    }

    /// Describe the index on the control plane
    async fn describe(&self) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Describe request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Describe index '{}' returned {}: {}",
                self.index_name, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse index description: {}", e)))
    }

    /// Resolve the data plane base URL, describing the index once and caching
    async fn data_url(&self) -> Result<String> {
        if let Some(host) = self.host.read().clone() {
            return Ok(format!("https://{}", host));
        }

        let description = self.describe().await?;
        let host = description.host.ok_or_else(|| {
            Error::VectorIndex(format!(
                "Index '{}' has no data plane host yet",
                self.index_name
            ))
        })?;

        *self.host.write() = Some(host.clone());
        Ok(format!("https://{}", host))
    }

    /// Send a JSON request to the data plane and decode the response
    async fn data_post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: serde::Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.data_url().await?, path);
        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "{} returned {}: {}",
                path, status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse {} response: {}", path, e)))
    }

    /// Convert a chunk to an upsert record
    fn chunk_to_record(chunk: &Chunk) -> Result<VectorRecord> {
        if chunk.embedding.is_empty() {
            return Err(Error::VectorIndex(format!(
                "Chunk {} has no embedding",
                chunk.id
            )));
        }
        Ok(VectorRecord {
            id: chunk.id.to_string(),
            values: chunk.embedding.clone(),
            metadata: chunk.to_index_metadata(),
        })
    }

    /// Rebuild a scored chunk from a query match
    fn match_to_chunk(m: QueryMatch) -> ScoredChunk {
        let metadata = m.metadata.unwrap_or_default();
        let text = metadata
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let filename = metadata
            .get("filename")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        let page_number = metadata
            .get("page_number")
            .and_then(|v| v.as_u64())
            .map(|p| p as u32);
        let document_id = metadata
            .get("document_id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::nil);

        ScoredChunk {
            chunk_id: Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::nil()),
            document_id,
            content: text,
            filename,
            page_number,
            score: m.score,
        }
    }
}

#[derive(serde::Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(serde::Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(serde::Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(serde::Deserialize)]
struct ListIndexesResponse {
    indexes: Vec<IndexDescription>,
}

#[derive(serde::Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(serde::Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(serde::Serialize)]
struct UpsertRequest {
    vectors: Vec<VectorRecord>,
    namespace: String,
}

#[derive(Debug, serde::Serialize)]
struct VectorRecord {
    id: String,
    values: Vec<f32>,
    metadata: serde_json::Value,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: usize,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    namespace: String,
}

#[derive(serde::Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(serde::Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: usize,
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let vectors = chunks
            .iter()
            .map(Self::chunk_to_record)
            .collect::<Result<Vec<_>>>()?;

        let request = UpsertRequest {
            vectors,
            namespace: self.namespace.clone(),
        };

        let response: UpsertResponse = self.data_post("/vectors/upsert", &request).await?;
        Ok(response.upserted_count)
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let request = QueryRequest {
            vector: embedding.to_vec(),
            top_k,
            include_metadata: true,
            namespace: self.namespace.clone(),
        };

        let response: QueryResponse = self.data_post("/query", &request).await?;
        Ok(response
            .matches
            .into_iter()
            .map(Self::match_to_chunk)
            .collect())
    }

    async fn create_index(&self, dimensions: usize) -> Result<()> {
        let request = CreateIndexRequest {
            name: &self.index_name,
            dimension: dimensions,
            metric: &self.metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &self.cloud,
                    region: &self.region,
                },
            },
        };

        let url = format!("{}/indexes", self.control_url);
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Create request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Create index '{}' returned {}: {}",
                self.index_name, status, body
            )));
        }

        tracing::info!(index = %self.index_name, dimensions, "Index created");
        Ok(())
    }

    async fn delete_index(&self) -> Result<()> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "Delete index '{}' returned {}: {}",
                self.index_name, status, body
            )));
        }

        // Host is gone along with the index
        *self.host.write() = None;
        tracing::info!(index = %self.index_name, "Index deleted");
        Ok(())
    }

    async fn index_exists(&self) -> Result<bool> {
        let url = format!("{}/indexes", self.control_url);
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("List request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorIndex(format!(
                "List indexes returned {}: {}",
                status, body
            )));
        }

        let list: ListIndexesResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorIndex(format!("Failed to parse index list: {}", e)))?;

        Ok(list.indexes.iter().any(|i| i.name == self.index_name))
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let description = self.describe().await?;
            if description.status.map(|s| s.ready).unwrap_or(false) {
                return Ok(());
            }
            if std::time::Instant::now() >= deadline {
                return Err(Error::VectorIndex(format!(
                    "Index '{}' not ready after {:?}",
                    self.index_name, timeout
                )));
            }
            tracing::debug!(index = %self.index_name, "Index not ready yet, polling");
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    async fn vector_count(&self) -> Result<usize> {
        let stats: StatsResponse = self
            .data_post("/describe_index_stats", &serde_json::json!({}))
            .await?;
        Ok(stats.total_vector_count)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/indexes", self.control_url);
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::VectorIndex(format!("Health check failed: {}", e)))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
