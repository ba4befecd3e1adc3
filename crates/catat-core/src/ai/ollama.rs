//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. Extraction requests pass the JSON
//! Schema as `format` so the model output is constrained to the transaction
//! shape; prompts come from the prompt library.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ExtractedTransaction, ExtractionSchema};
use crate::prompts::{PromptLibrary, RenderedPrompt};

use super::parsing::{parse_extraction, parse_recommendation};
use super::schema::json_schema;
use super::{extraction_prompt, recommend_prompt, AIBackend};

/// Ollama backend
///
/// Configure with `OLLAMA_HOST` and `OLLAMA_MODEL`.
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    default_model: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, default_model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model: default_model.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create a new instance with a different model
    ///
    /// Used for runtime model override (e.g. `catat parse --model`)
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            default_model: model.to_string(),
            ..self.clone()
        }
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    async fn generate(&self, prompt: RenderedPrompt, format: Option<Value>) -> Result<String> {
        let request = OllamaRequest {
            model: self.default_model.clone(),
            prompt: prompt.user,
            system: prompt.system,
            format,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        Ok(ollama_response.response)
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// JSON Schema constraining the output
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>> {
        let prompt = extraction_prompt(&self.prompts, text, schema)?;
        let response = self.generate(prompt, Some(json_schema(schema))).await?;
        debug!(schema = %schema, "Ollama response: {}", response);

        parse_extraction(&response, schema)
    }

    async fn recommend(&self, summary: &str, period: Option<&str>) -> Result<String> {
        let prompt = recommend_prompt(&self.prompts, summary, period)?;
        let response = self.generate(prompt, None).await?;
        debug!("Ollama recommendation: {} chars", response.len());

        parse_recommendation(&response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.default_model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
