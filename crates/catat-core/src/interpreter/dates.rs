//! Transaction date resolution
//!
//! Sign convention: a positive `day_offset` is that many days in the past, a
//! negative one is in the future. An explicit day of month always wins and
//! resolves to its most recent occurrence (this month if the day has been
//! reached, otherwise last month). Future day-of-month mentions are therefore
//! read as past dates.

use chrono::{Datelike, Days, NaiveDate};

/// Largest day offset accepted from a backend or caller (about 100 years)
pub const MAX_DAY_OFFSET: i64 = 36_500;

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Most recent date with the given day of month, relative to `today`
///
/// Days past the end of the target month clamp to its last day.
pub fn resolve_day_of_month(today: NaiveDate, day_of_month: u32) -> NaiveDate {
    let (mut year, mut month) = (today.year(), today.month());
    if day_of_month > today.day() {
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }

    let day = day_of_month.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
}

/// `today` shifted by a signed day offset (positive = past)
///
/// Offsets that leave the representable calendar resolve to `today`.
pub fn resolve_day_offset(today: NaiveDate, day_offset: i64) -> NaiveDate {
    let days = Days::new(day_offset.unsigned_abs());
    let shifted = if day_offset >= 0 {
        today.checked_sub_days(days)
    } else {
        today.checked_add_days(days)
    };
    shifted.unwrap_or(today)
}

/// Resolve a transaction date
///
/// `day_of_month` (1-31) takes precedence; zero is treated as absent.
pub fn resolve_date(
    today: NaiveDate,
    day_offset: Option<i64>,
    day_of_month: Option<u32>,
) -> NaiveDate {
    match day_of_month.filter(|d| *d > 0) {
        Some(day) => resolve_day_of_month(today, day),
        None => resolve_day_offset(today, day_offset.unwrap_or(0)),
    }
}

/// Display phrase for a transaction's timing, in Indonesian
pub fn describe_offset(day_offset: Option<i64>, day_of_month: Option<u32>) -> String {
    if let Some(day) = day_of_month.filter(|d| *d > 0) {
        return format!("tanggal {}", day);
    }

    match day_offset.unwrap_or(0) {
        0 => "hari ini".to_string(),
        1 => "kemarin".to_string(),
        7 => "seminggu lalu".to_string(),
        -1 => "besok".to_string(),
        -2 => "lusa".to_string(),
        n if n > 0 => format!("{} hari lalu", n),
        n => format!("{} hari lagi", n.unsigned_abs()),
    }
}
