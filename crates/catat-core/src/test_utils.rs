//! Test utilities for catat-core
//!
//! This module provides testing infrastructure including mock Ollama and
//! Gemini servers that can be used for development and integration tests.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::ai::extract_offline;
use crate::models::ExtractionSchema;

/// Mock Ollama server for testing and development
///
/// Answers `/api/generate` with the offline keyword extractor, so responses
/// follow the requested schema without a real model.
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate));

        let (addr, shutdown_tx) = spawn_server(app).await;
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Serve `app` on an ephemeral local port until the sender fires
async fn spawn_server(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// API key the mock Gemini server accepts
pub const MOCK_GEMINI_API_KEY: &str = "test-gemini-key";

/// A `generateContent` call as received by [`MockGeminiServer`]
#[derive(Debug, Clone)]
pub struct RecordedGeminiRequest {
    /// Last path segment, e.g. `gemini-pro:generateContent`
    pub model_action: String,
    pub api_key: Option<String>,
    pub body: Value,
}

struct GeminiState {
    requests: Mutex<Vec<RecordedGeminiRequest>>,
}

/// Mock Gemini server for testing
///
/// Serves `POST /v1beta/models/{model}:generateContent` and
/// `GET /v1beta/models/{model}`. Requests without [`MOCK_GEMINI_API_KEY`] in
/// `x-goog-api-key` get a 403. Extraction answers come from the offline
/// extractor and are split across two candidate parts.
pub struct MockGeminiServer {
    addr: SocketAddr,
    state: Arc<GeminiState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(GeminiState {
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/v1beta/models/:model_action",
                get(handle_gemini_model).post(handle_generate_content),
            )
            .with_state(state.clone());

        let (addr, shutdown_tx) = spawn_server(app).await;
        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// `generateContent` calls received so far
    pub fn requests(&self) -> Vec<RecordedGeminiRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn gemini_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn gemini_error(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": { "code": status.as_u16(), "message": message }
    });
    (status, Json(body)).into_response()
}

/// Model metadata endpoint (health check)
async fn handle_gemini_model(Path(model): Path<String>, headers: HeaderMap) -> Response {
    if gemini_api_key(&headers).as_deref() != Some(MOCK_GEMINI_API_KEY) {
        return gemini_error(StatusCode::FORBIDDEN, "API key not valid");
    }
    Json(json!({ "name": format!("models/{}", model) })).into_response()
}

/// generateContent endpoint
///
/// A `responseSchema` means extraction; its shape tells single from multi.
/// Without one the request is a recommendation and gets canned advice.
async fn handle_generate_content(
    State(state): State<Arc<GeminiState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = gemini_api_key(&headers);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedGeminiRequest {
            model_action: model_action.clone(),
            api_key: api_key.clone(),
            body: body.clone(),
        });
    }

    if !model_action.ends_with(":generateContent") {
        return gemini_error(StatusCode::NOT_FOUND, "Unknown method");
    }
    if api_key.as_deref() != Some(MOCK_GEMINI_API_KEY) {
        return gemini_error(StatusCode::FORBIDDEN, "API key not valid");
    }

    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let text = match body["generationConfig"].get("responseSchema") {
        Some(schema) => {
            let schema = if schema["properties"].get("transactions").is_some() {
                ExtractionSchema::Multi
            } else {
                ExtractionSchema::Single
            };
            extraction_mock(prompt, schema)
        }
        None => advice_mock(prompt),
    };

    // Split across parts; the client joins them
    let mid = text.char_indices().nth(text.chars().count() / 2).map_or(0, |(i, _)| i);
    let (head, tail) = text.split_at(mid);

    Json(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": head }, { "text": tail }]
            },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
///
/// A `format` schema means extraction; its shape tells single from multi.
/// Without one the request is a recommendation and gets canned advice.
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<GenerateResponse> {
    let response = match request.format {
        Some(ref format) => {
            let schema = if format["properties"].get("transactions").is_some() {
                ExtractionSchema::Multi
            } else {
                ExtractionSchema::Single
            };
            extraction_mock(&request.prompt, schema)
        }
        None => advice_mock(&request.prompt),
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
}

/// Serialize offline extraction in the shape the schema asks for
fn extraction_mock(prompt: &str, schema: ExtractionSchema) -> String {
    let records = extract_offline(prompt, schema);
    let value = match schema {
        ExtractionSchema::Single => records
            .into_iter()
            .next()
            .map(|tx| serde_json::to_value(tx).unwrap_or(Value::Null))
            .unwrap_or_else(|| json!({})),
        ExtractionSchema::Multi => json!({ "transactions": records }),
    };
    value.to_string()
}

fn advice_mock(prompt: &str) -> String {
    let lines = prompt.lines().filter(|l| !l.trim().is_empty()).count();
    format!(
        "## Ringkasan\nData berisi {} baris ringkasan.\n\n## Saran\n- Sisihkan 10% pemasukan untuk tabungan.\n- Catat pengeluaran kecil setiap hari.",
        lines
    )
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[allow(dead_code)]
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}
