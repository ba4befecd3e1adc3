//! Backend health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use catat_core::AIBackend;

/// Backend availability
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub backend: Option<BackendStatus>,
}

#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub kind: &'static str,
    pub model: String,
    pub host: String,
    pub available: bool,
}

/// GET /api/health - Server and AI backend status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let backend = match state.interpreter.client() {
        Some(client) => Some(BackendStatus {
            kind: client.kind(),
            model: client.model().to_string(),
            host: client.host().to_string(),
            // Live check
            available: client.health_check().await,
        }),
        None => None,
    };

    Json(HealthStatus {
        status: "ok",
        backend,
    })
}
