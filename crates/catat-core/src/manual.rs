//! Manual transaction entry checks
//!
//! Manual entry is the fallback when extraction fails. Dates are accepted
//! from one year back through one year ahead of the reference date, inclusive.

use chrono::{Months, NaiveDate};

use crate::error::{Error, Result};
use crate::models::LedgerEntry;

pub const AMOUNT_NOT_POSITIVE: &str = "Jumlah transaksi harus lebih dari 0";
pub const DATE_TOO_OLD: &str =
    "Transaksi tidak dapat dicatat untuk tanggal lebih dari 1 tahun yang lalu";
pub const DATE_TOO_FAR_AHEAD: &str =
    "Transaksi tidak dapat dicatat untuk tanggal lebih dari 1 tahun ke depan";

/// Earliest and latest dates a manual entry may carry
///
/// February 29 maps to February 28 in non-leap years.
pub fn allowed_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    let latest = today
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX);
    (earliest, latest)
}

/// Validate a manually entered amount and date
///
/// Failures are [`Error::InvalidData`] with an Indonesian message for the user.
pub fn validate_manual_entry(amount: f64, date: NaiveDate, today: NaiveDate) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(AMOUNT_NOT_POSITIVE.into()));
    }

    let (earliest, latest) = allowed_range(today);
    if date < earliest {
        return Err(Error::InvalidData(DATE_TOO_OLD.into()));
    }
    if date > latest {
        return Err(Error::InvalidData(DATE_TOO_FAR_AHEAD.into()));
    }
    Ok(())
}

impl LedgerEntry {
    /// Check this row as a manual entry made on `today`
    pub fn validate_manual(&self, today: NaiveDate) -> Result<()> {
        validate_manual_entry(self.amount, self.date, today)
    }
}
