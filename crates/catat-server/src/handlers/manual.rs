//! Manual transaction entry handler

use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::AppError;
use catat_core::{Error as CoreError, LedgerEntry};

/// Request body for a manually entered transaction
#[derive(Debug, Deserialize)]
pub struct ManualTransactionRequest {
    #[serde(flatten)]
    pub entry: LedgerEntry,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// POST /api/manual-transaction - Check a manual entry before it is stored
///
/// Returns the normalized row; the caller persists it.
pub async fn manual_transaction(
    Json(req): Json<ManualTransactionRequest>,
) -> Result<Json<LedgerEntry>, AppError> {
    let today = req
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut entry = req.entry;
    entry.validate_manual(today).map_err(|e| match e {
        CoreError::InvalidData(message) => AppError::bad_request(&message),
        other => AppError::from_core(other),
    })?;
    entry.description = entry.description.trim().to_string();

    Ok(Json(entry))
}
