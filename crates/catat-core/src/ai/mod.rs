//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the two model calls
//! the app makes: structured transaction extraction and free-text spending
//! advice.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`,
//!   `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let records = client.extract("bayar makan 50rb", ExtractionSchema::Single).await?;
//!     println!("{:?}", records);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, ollama, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash-exp)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod gemini;
mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod schema;

pub use gemini::GeminiBackend;
pub use mock::{extract_offline, MockBackend, MockCall};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{ExtractedTransaction, ExtractionSchema};
use crate::prompts::{PromptId, PromptLibrary, RenderedPrompt};

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Extract transactions from free text using the given response shape
    ///
    /// Returns validated records: exactly one for `Single`, at least one for
    /// `Multi`. Transport and validation failures are both errors.
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>>;

    /// Produce spending advice from a rendered summary
    async fn recommend(&self, summary: &str, period: Option<&str>) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Render a prompt from a shared library
pub(crate) fn render_prompt(
    prompts: &RwLock<PromptLibrary>,
    id: PromptId,
    vars: &HashMap<&str, &str>,
) -> Result<RenderedPrompt> {
    let mut prompts = prompts
        .write()
        .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
    prompts.render(id, vars)
}

/// Render the extraction prompt for `text`
pub(crate) fn extraction_prompt(
    prompts: &RwLock<PromptLibrary>,
    text: &str,
    schema: ExtractionSchema,
) -> Result<RenderedPrompt> {
    let mut vars = HashMap::new();
    vars.insert("text", text);
    render_prompt(prompts, PromptId::for_schema(schema), &vars)
}

/// Render the advice prompt for a summary
pub(crate) fn recommend_prompt(
    prompts: &RwLock<PromptLibrary>,
    summary: &str,
    period: Option<&str>,
) -> Result<RenderedPrompt> {
    let mut vars = HashMap::new();
    vars.insert("summary", summary);
    if let Some(period) = period {
        vars.insert("period", period);
    }
    render_prompt(prompts, PromptId::Recommend, &vars)
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// All variants implement the same AIBackend operations.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini (generateContent API)
    Gemini(GeminiBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing and offline use
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): Uses GEMINI_API_KEY, GEMINI_MODEL and GEMINI_HOST
    /// - `ollama`: Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates the offline rule-based backend
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env().map(AIClient::Gemini),
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AIClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(api_key, model))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for status output
    pub fn kind(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::Ollama(_) => "ollama",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Gemini(b) => AIClient::Gemini(b.with_model(model)),
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>> {
        match self {
            AIClient::Gemini(b) => b.extract(text, schema).await,
            AIClient::Ollama(b) => b.extract(text, schema).await,
            AIClient::OpenAICompatible(b) => b.extract(text, schema).await,
            AIClient::Mock(b) => b.extract(text, schema).await,
        }
    }

    async fn recommend(&self, summary: &str, period: Option<&str>) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.recommend(summary, period).await,
            AIClient::Ollama(b) => b.recommend(summary, period).await,
            AIClient::OpenAICompatible(b) => b.recommend(summary, period).await,
            AIClient::Mock(b) => b.recommend(summary, period).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
