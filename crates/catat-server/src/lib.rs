//! Catat Web Server
//!
//! Axum-based REST API over the Catat message interpreter.
//!
//! Security features:
//! - Restrictive CORS policy (origins from `CATAT_ALLOWED_ORIGINS`)
//! - Security headers on every response
//! - Sanitized error responses (internal details are only logged)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use catat_core::ai::AIBackend;
use catat_core::{Error as CoreError, Interpreter};

mod handlers;

/// Environment variable with comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "CATAT_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            allowed_origins: std::env::var(ALLOWED_ORIGINS_ENV)
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }
}

/// Parse a comma-separated origin list, skipping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub interpreter: Interpreter,
}

/// Create the application router
pub fn create_router(interpreter: Interpreter, config: ServerConfig) -> Router {
    match interpreter.client() {
        Some(client) => info!(
            "AI backend configured: {} at {} (model: {})",
            client.kind(),
            client.host(),
            client.model()
        ),
        None => warn!("No AI backend configured - transaction parsing will be unavailable"),
    }

    let cors = cors_layer(&config.allowed_origins);
    let state = Arc::new(AppState { interpreter });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/parse-transaction", post(handlers::parse_transaction))
        .route("/manual-transaction", post(handlers::manual_transaction))
        .route("/summary", post(handlers::summary))
        .route("/recommendations", post(handlers::recommendations));

    // CSP: API only, nothing to load
    let csp_value = HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'");

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Start the server with the backend and configuration from the environment
pub async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(Interpreter::from_env(), host, port, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    interpreter: Interpreter,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(&interpreter).await;

    let app = create_router(interpreter, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(interpreter: &Interpreter) {
    match interpreter.client() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured (set GEMINI_API_KEY or AI_BACKEND to enable parsing)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to a response
    ///
    /// Extraction messages are user-facing and passed through; everything
    /// else is logged and replaced with a generic message.
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::Extraction(message) => Self::bad_gateway(&message),
            CoreError::Config(_) => Self {
                internal: Some(err.into()),
                ..Self::service_unavailable("AI backend is not configured")
            },
            CoreError::Recommendation(_) => Self {
                internal: Some(err.into()),
                ..Self::bad_gateway("Failed to generate recommendation")
            },
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
