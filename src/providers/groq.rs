//! Groq chat completion provider
//!
//! Uses Groq's OpenAI-compatible `/chat/completions` endpoint. The retrieved
//! context is folded into a system message by [`PromptBuilder`] before the
//! request goes out.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{require_env, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::llm::LlmProvider;

/// Environment variable holding the API key
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Groq chat completion client
pub struct GroqChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    prompt_builder: PromptBuilder,
}

impl GroqChat {
    /// Create a new client with an explicit API key
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Create a new client, reading the API key from the environment
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        Ok(Self::new(require_env(GROQ_API_KEY_ENV)?, config))
    }

    /// Send a chat completion request and return the first choice's text
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Chat completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!(
                "Chat completion returned {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse completion response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Llm("Completion contained no choices".to_string()))
    }
}

#[derive(serde::Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system".to_string(),
            content,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(serde::Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(serde::Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[async_trait]
impl LlmProvider for GroqChat {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let system_prompt = self.prompt_builder.build_prompt(context);
        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(question.to_string()),
        ];

        let answer = self.complete(messages).await?;
        Ok(answer.trim().to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Health check failed: {}", e)))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
