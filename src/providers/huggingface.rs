//! HuggingFace Inference API embedding provider
//!
//! Calls the hosted feature-extraction pipeline for sentence-transformer
//! models; no model is downloaded locally.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{require_env, EmbeddingConfig};
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Environment variable holding the API token
pub const HF_API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

/// Maximum inputs sent in a single feature-extraction request
const MAX_INPUTS_PER_REQUEST: usize = 128;

/// HuggingFace Inference API embedder
pub struct HfInferenceEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl HfInferenceEmbedder {
    /// Create a new embedder with an explicit API key
    pub fn new(api_key: String, config: &EmbeddingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }

    /// Create a new embedder, reading the API key from the environment
    pub fn from_env(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self::new(require_env(HF_API_KEY_ENV)?, config))
    }

    /// Get the feature-extraction endpoint URL
    fn endpoint(&self) -> String {
        format!(
            "{}/pipeline/feature-extraction/{}",
            self.base_url, self.model
        )
    }

    /// Send one feature-extraction request
    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = FeatureExtractionRequest {
            inputs,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Inference API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Inference API returned {}: {}",
                status, body
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        for embedding in &embeddings {
            if embedding.len() != self.dimensions {
                return Err(Error::Embedding(format!(
                    "Model {} returned {} dimensions, expected {}",
                    self.model,
                    embedding.len(),
                    self.dimensions
                )));
            }
        }

        Ok(embeddings)
    }
}

#[derive(serde::Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(serde::Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[async_trait]
impl EmbeddingProvider for HfInferenceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = vec![text.to_string()];
        self.request(&inputs)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embedding in response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_INPUTS_PER_REQUEST) {
            all_embeddings.extend(self.request(batch).await?);
        }
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let inputs = vec!["health check".to_string()];
        Ok(self.request(&inputs).await.is_ok())
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let config = EmbeddingConfig::default();
        let embedder = HfInferenceEmbedder::new("hf_test".to_string(), &config);
        assert_eq!(
            embedder.endpoint(),
            "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let inputs = vec!["what is anemia?".to_string()];
        let request = FeatureExtractionRequest {
            inputs: &inputs,
            options: RequestOptions {
                wait_for_model: true,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["inputs"][0], "what is anemia?");
        assert_eq!(value["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_response_parses_as_nested_vectors() {
        let raw = "[[0.1, -0.2, 0.3], [0.0, 0.5, -0.5]]";
        let embeddings: Vec<Vec<f32>> = serde_json::from_str(raw).unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 3);
    }
}
