//! Google Gemini backend implementation
//!
//! Talks to the `generateContent` REST endpoint. Extraction requests set
//! `responseMimeType: application/json` with a `responseSchema`, so the model
//! is constrained to the transaction shape.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash-exp)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

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
use super::schema::gemini_schema;
use super::{extraction_prompt, recommend_prompt, AIBackend};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl GeminiBackend {
    /// Create a backend against the public Gemini API
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_host(DEFAULT_GEMINI_HOST, api_key, model)
    }

    /// Create a backend against a custom host (proxies, test servers)
    pub fn with_host(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
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
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL`, `GEMINI_HOST`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let host =
            std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());
        Some(Self::with_host(&host, &api_key, &model))
    }

    /// Call `generateContent` and return the first candidate's text
    async fn generate(
        &self,
        prompt: RenderedPrompt,
        response_schema: Option<Value>,
    ) -> Result<String> {
        let request = GenerateContentRequest {
            system_instruction: prompt.system.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt.user }],
            }],
            generation_config: response_schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        };

        let response = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json().await?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::InvalidData("No candidates in Gemini response".into()))
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>> {
        let prompt = extraction_prompt(&self.prompts, text, schema)?;
        let response = self.generate(prompt, Some(gemini_schema(schema))).await?;
        debug!(schema = %schema, "Gemini response: {}", response);

        parse_extraction(&response, schema)
    }

    async fn recommend(&self, summary: &str, period: Option<&str>) -> Result<String> {
        let prompt = recommend_prompt(&self.prompts, summary, period)?;
        let response = self.generate(prompt, None).await?;
        debug!("Gemini recommendation: {} chars", response.len());

        parse_recommendation(&response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models/{}", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
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
