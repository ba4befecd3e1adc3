//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - Docker Model Runner (http://localhost:12434)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ExtractedTransaction, ExtractionSchema};
use crate::prompts::{PromptLibrary, RenderedPrompt};

use super::parsing::{parse_extraction, parse_recommendation};
use super::schema::json_schema;
use super::{extraction_prompt, recommend_prompt, AIBackend};

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// // vLLM
/// export OPENAI_COMPATIBLE_HOST="http://192.168.1.100:8000"
/// export OPENAI_COMPATIBLE_MODEL="meta-llama/Llama-3.2-3B-Instruct"
///
/// // LocalAI
/// export OPENAI_COMPATIBLE_HOST="http://192.168.1.100:8080"
/// export OPENAI_COMPATIBLE_MODEL="llama-3.2-3b"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (default: gpt-3.5-turbo)
    /// Optional: `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model = std::env::var("OPENAI_COMPATIBLE_MODEL")
            .unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

        let mut backend = Self::new(&host, &model);
        backend.api_key = std::env::var("OPENAI_COMPATIBLE_API_KEY").ok();
        Some(backend)
    }

    /// Make a chat completion request
    async fn chat_completion(
        &self,
        prompt: RenderedPrompt,
        response_format: Option<Value>,
        temperature: f32,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.user,
        });

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(temperature),
            response_format,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

/// `response_format` requesting structured output for `schema`
fn response_format(schema: ExtractionSchema) -> Value {
    let name = match schema {
        ExtractionSchema::Single => "transaction",
        ExtractionSchema::Multi => "transactions",
    };
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "schema": json_schema(schema),
        }
    })
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>> {
        let prompt = extraction_prompt(&self.prompts, text, schema)?;
        let response = self
            .chat_completion(prompt, Some(response_format(schema)), 0.1)
            .await?;
        debug!(schema = %schema, "OpenAI-compatible response: {}", response);

        parse_extraction(&response, schema)
    }

    async fn recommend(&self, summary: &str, period: Option<&str>) -> Result<String> {
        let prompt = recommend_prompt(&self.prompts, summary, period)?;
        let response = self.chat_completion(prompt, None, 0.7).await?;
        debug!("OpenAI-compatible recommendation: {} chars", response.len());

        parse_recommendation(&response)
    }

    async fn health_check(&self) -> bool {
        // Try /v1/models first (standard OpenAI endpoint)
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try /health (common for LocalAI, llama-server)
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
