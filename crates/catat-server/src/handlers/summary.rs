//! Spending summary and recommendation handlers
//!
//! The caller supplies the ledger rows; the server holds no storage.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use catat_core::summary::{self, insufficient_history};
use catat_core::{LedgerEntry, Period, SpendingSummary};

/// Request body carrying ledger rows
#[derive(Debug, Deserialize)]
pub struct LedgerRequest {
    #[serde(default)]
    pub transactions: Vec<LedgerEntry>,
    /// Reference date for month counting (defaults to the server's local date)
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Dashboard period filter (summary only; advice always uses every row)
    #[serde(default)]
    pub period: Period,
}

impl LedgerRequest {
    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Response for advice requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendation: String,
    pub enough_data: bool,
}

/// POST /api/summary - Aggregate ledger rows
pub async fn summary(Json(req): Json<LedgerRequest>) -> Json<SpendingSummary> {
    Json(SpendingSummary::for_period(
        &req.transactions,
        req.period,
        req.today(),
    ))
}

/// POST /api/recommendations - Budgeting advice over ledger rows
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LedgerRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let recommendation = match insufficient_history(&req.transactions) {
        Some(answer) => answer,
        None => {
            let client = state
                .interpreter
                .client()
                .ok_or_else(|| AppError::service_unavailable("AI backend is not configured"))?;
            summary::recommend(client, &req.transactions, req.today())
                .await
                .map_err(AppError::from_core)?
        }
    };

    Ok(Json(RecommendationResponse {
        enough_data: recommendation.has_enough_data(),
        recommendation: recommendation.text().to_string(),
    }))
}
