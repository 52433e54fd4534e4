//! Shared application state

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{
    EmbeddingProvider, GroqChat, HfInferenceEmbedder, LlmProvider, PineconeIndex,
    VectorIndexProvider,
};
use crate::retrieval::Retriever;

/// Shared application state, cheap to clone across handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
    ready: RwLock<bool>,
}

impl AppState {
    /// Build state with the hosted providers, reading API keys from the environment
    pub fn new(config: RagConfig) -> Result<Self> {
        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(HfInferenceEmbedder::from_env(&config.embeddings)?);
        let index: Arc<dyn VectorIndexProvider> =
            Arc::new(PineconeIndex::from_env(&config.index)?);
        let llm: Arc<dyn LlmProvider> = Arc::new(GroqChat::from_env(&config.llm)?);
        Ok(Self::from_providers(config, embedder, index, llm))
    }

    /// Build state from explicit providers
    pub fn from_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                retriever: Retriever::new(embedder, index),
                llm,
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    pub fn llm(&self) -> &dyn LlmProvider {
        self.inner.llm.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
