//! Chat message parsing handler

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use catat_core::Interpretation;

/// Request body for parsing a chat message
#[derive(Debug, Deserialize)]
pub struct ParseTransactionRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Reference date for relative phrases (defaults to the server's local date)
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// POST /api/parse-transaction - Interpret one chat message
pub async fn parse_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseTransactionRequest>,
) -> Result<Json<Interpretation>, AppError> {
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("Text is required"))?;

    let today = req
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let outcome = state
        .interpreter
        .interpret_on(text, today)
        .await
        .map_err(AppError::from_core)?;

    info!(
        transactions = outcome.transactions().len(),
        "Parsed chat message"
    );

    Ok(Json(outcome))
}
