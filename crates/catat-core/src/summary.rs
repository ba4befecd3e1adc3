//! Spending summary and budgeting advice
//!
//! Aggregates ledger rows supplied by the caller into a [`SpendingSummary`],
//! renders it as the brief fed to the `recommend` prompt, and asks the
//! backend for advice once there is enough history.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::AIBackend;
use crate::amount::format_rupiah;
use crate::error::{Error, Result};
use crate::models::{Category, LedgerEntry, TransactionKind};

/// Entries needed before the backend is asked for advice
pub const MIN_TRANSACTIONS_FOR_ADVICE: usize = 3;

/// Number of entries listed in the "recent" section
pub const RECENT_LIMIT: usize = 10;

/// Dashboard period filter
///
/// `Week` and `Month` are rolling windows of 7 and 30 days ending today.
/// Entries dated after today are kept by every filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    #[default]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Dashboard label, in Indonesian
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Hari Ini",
            Self::Week => "Minggu Ini (7 Hari)",
            Self::Month => "Bulan Ini (30 Hari)",
            Self::All => "Semua",
        }
    }

    /// First date inside the window, or `None` for `All`
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            Self::Today => 0,
            Self::Week => 7,
            Self::Month => 30,
            Self::All => return None,
        };
        Some(today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.start(today).map_or(true, |start| date >= start)
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "hari-ini" => Ok(Self::Today),
            "week" | "minggu" => Ok(Self::Week),
            "month" | "bulan" => Ok(Self::Month),
            "all" | "semua" => Ok(Self::All),
            other => Err(format!("Unknown period: {}", other)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    /// Share of total expense, 0-100
    pub percentage: f64,
}

/// Aggregated view over a user's ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub transaction_count: usize,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    /// Months covered, at least 1
    pub months: u32,
    pub avg_monthly_income: f64,
    pub avg_monthly_expense: f64,
    /// Expense per category, largest first
    pub by_category: Vec<CategoryTotal>,
    /// Most recent entries, newest first
    pub recent: Vec<LedgerEntry>,
}

impl SpendingSummary {
    /// Summary over the entries that fall inside `period`
    pub fn for_period(entries: &[LedgerEntry], period: Period, today: NaiveDate) -> Self {
        let filtered: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| period.contains(e.date, today))
            .cloned()
            .collect();
        Self::from_entries(&filtered, today)
    }

    pub fn from_entries(entries: &[LedgerEntry], today: NaiveDate) -> Self {
        let mut sorted: Vec<&LedgerEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let total_of = |kind: TransactionKind| -> f64 {
            entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.amount)
                .sum()
        };
        let total_income = total_of(TransactionKind::Income);
        let total_expense = total_of(TransactionKind::Expense);

        let period_end = sorted.first().map(|e| e.date);
        let period_start = sorted.last().map(|e| e.date);
        let months = period_start
            .map(|oldest| months_since(oldest, today))
            .unwrap_or(1);

        let mut by_category: Vec<CategoryTotal> = Vec::new();
        for entry in entries.iter().filter(|e| e.kind == TransactionKind::Expense) {
            match by_category.iter_mut().find(|c| c.category == entry.category) {
                Some(total) => total.amount += entry.amount,
                None => by_category.push(CategoryTotal {
                    category: entry.category,
                    amount: entry.amount,
                    percentage: 0.0,
                }),
            }
        }
        for total in &mut by_category {
            total.percentage = if total_expense > 0.0 {
                total.amount / total_expense * 100.0
            } else {
                0.0
            };
        }
        by_category.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        Self {
            transaction_count: entries.len(),
            total_income,
            total_expense,
            balance: total_income - total_expense,
            period_start,
            period_end,
            months,
            avg_monthly_income: total_income / f64::from(months),
            avg_monthly_expense: total_expense / f64::from(months),
            by_category,
            recent: sorted.into_iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }

    /// Covered period, e.g. "2024-01-05 sampai 2024-03-15 (3 bulan)"
    pub fn period(&self) -> Option<String> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(format!(
                "{} sampai {} ({} bulan)",
                start, end, self.months
            )),
            _ => None,
        }
    }

    /// Plain-text brief handed to the advice prompt
    pub fn render(&self) -> String {
        let mut out = format!("Total transaksi: {}\n", self.transaction_count);
        if let Some(period) = self.period() {
            out.push_str(&format!("Periode: {}\n", period));
        }

        out.push_str("\nRINGKASAN KEUANGAN:\n");
        out.push_str(&format!(
            "- Total Pemasukan: {}\n",
            format_rupiah(self.total_income)
        ));
        out.push_str(&format!(
            "- Total Pengeluaran: {}\n",
            format_rupiah(self.total_expense)
        ));
        out.push_str(&format!("- Saldo: {}\n", format_rupiah(self.balance)));
        out.push_str(&format!(
            "- Rata-rata Pemasukan per Bulan: {}\n",
            format_rupiah(self.avg_monthly_income)
        ));
        out.push_str(&format!(
            "- Rata-rata Pengeluaran per Bulan: {}\n",
            format_rupiah(self.avg_monthly_expense)
        ));

        if !self.by_category.is_empty() {
            out.push_str("\nPENGELUARAN PER KATEGORI:\n");
            for total in &self.by_category {
                out.push_str(&format!(
                    "- {}: {} ({:.1}%)\n",
                    total.category,
                    format_rupiah(total.amount),
                    total.percentage
                ));
            }
        }

        if !self.recent.is_empty() {
            out.push_str(&format!("\nDETAIL {} TRANSAKSI TERAKHIR:\n", self.recent.len()));
            for entry in &self.recent {
                out.push_str(&format!(
                    "- {}: {} {} - {} ({})\n",
                    entry.date,
                    entry.kind.label(),
                    format_rupiah(entry.amount),
                    entry.category,
                    entry.description
                ));
            }
        }

        out
    }
}

/// `max(1, ceil(days / 30))`
fn months_since(oldest: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - oldest).num_days().max(0);
    let months = (days + 29) / 30;
    u32::try_from(months).unwrap_or(u32::MAX).max(1)
}

/// Outcome of an advice request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recommendation {
    /// Too little history; `message` encourages recording more
    NotEnoughData {
        have: usize,
        need: usize,
        message: String,
    },
    /// Free-form markdown from the backend
    Advice { text: String },
}

impl Recommendation {
    /// Markdown to show the user
    pub fn text(&self) -> &str {
        match self {
            Self::NotEnoughData { message, .. } => message,
            Self::Advice { text } => text,
        }
    }

    pub fn has_enough_data(&self) -> bool {
        matches!(self, Self::Advice { .. })
    }
}

fn not_enough_data_message(have: usize) -> String {
    let missing = MIN_TRANSACTIONS_FOR_ADVICE.saturating_sub(have);
    format!(
        "# Analisis Keuangan Kamu\n\n\
         ## Belum Cukup Data\n\n\
         Kamu baru punya **{have} transaksi**, padahal minimal butuh **{need} transaksi** \
         buat kasih rekomendasi yang akurat.\n\n\
         ## Yuk Tambahin Transaksi\n\n\
         Tinggal chat natural aja:\n\
         - \"Bayar makan 50rb\"\n\
         - \"Kemarin gajian 5 juta\"\n\
         - \"Besok bayar kos 1.5 juta\"\n\n\
         ## Tips Sambil Nunggu Data\n\n\
         - Catat semua transaksi, sekecil apapun.\n\
         - Coba aturan 50/30/20: kebutuhan, keinginan, tabungan.\n\
         - Sisihkan 10-20% penghasilan buat dana darurat.\n\n\
         Tambahin **{missing} transaksi lagi**, terus minta analisis ulang.",
        have = have,
        need = MIN_TRANSACTIONS_FOR_ADVICE,
        missing = missing,
    )
}

/// The `NotEnoughData` answer, if `entries` is too short for advice
pub fn insufficient_history(entries: &[LedgerEntry]) -> Option<Recommendation> {
    if entries.len() >= MIN_TRANSACTIONS_FOR_ADVICE {
        return None;
    }
    info!(
        have = entries.len(),
        need = MIN_TRANSACTIONS_FOR_ADVICE,
        "Not enough transactions for advice"
    );
    Some(Recommendation::NotEnoughData {
        have: entries.len(),
        need: MIN_TRANSACTIONS_FOR_ADVICE,
        message: not_enough_data_message(entries.len()),
    })
}

/// Ask the backend for budgeting advice over `entries`
///
/// Below [`MIN_TRANSACTIONS_FOR_ADVICE`] entries the backend is not called.
pub async fn recommend<B>(
    backend: &B,
    entries: &[LedgerEntry],
    today: NaiveDate,
) -> Result<Recommendation>
where
    B: AIBackend + ?Sized,
{
    if let Some(answer) = insufficient_history(entries) {
        return Ok(answer);
    }

    let summary = SpendingSummary::from_entries(entries, today);
    let period = summary.period();
    let text = backend
        .recommend(&summary.render(), period.as_deref())
        .await
        .map_err(|e| {
            warn!(model = backend.model(), error = %e, "Recommendation failed");
            Error::Recommendation(e.to_string())
        })?;

    info!(
        transactions = entries.len(),
        chars = text.len(),
        "Generated recommendation"
    );
    Ok(Recommendation::Advice { text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, MockCall};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        amount: f64,
        kind: TransactionKind,
        category: Category,
        description: &str,
        date: NaiveDate,
    ) -> LedgerEntry {
        LedgerEntry {
            amount,
            kind,
            category,
            description: description.to_string(),
            date,
        }
    }

    fn sample() -> Vec<LedgerEntry> {
        vec![
            entry(
                5_000_000.0,
                TransactionKind::Income,
                Category::Salary,
                "Gaji",
                date(2024, 1, 25),
            ),
            entry(
                1_200_000.0,
                TransactionKind::Expense,
                Category::Bills,
                "Bayar kos",
                date(2024, 2, 1),
            ),
            entry(
                50_000.0,
                TransactionKind::Expense,
                Category::Food,
                "Makan siang",
                date(2024, 3, 14),
            ),
            entry(
                250_000.0,
                TransactionKind::Expense,
                Category::Food,
                "Belanja bulanan",
                date(2024, 3, 10),
            ),
        ]
    }

    #[test]
    fn test_totals_and_balance() {
        let summary = SpendingSummary::from_entries(&sample(), date(2024, 3, 15));
        assert_eq!(summary.transaction_count, 4);
        assert_eq!(summary.total_income, 5_000_000.0);
        assert_eq!(summary.total_expense, 1_500_000.0);
        assert_eq!(summary.balance, 3_500_000.0);
    }

    #[test]
    fn test_period_and_months() {
        let summary = SpendingSummary::from_entries(&sample(), date(2024, 3, 15));
        assert_eq!(summary.period_start, Some(date(2024, 1, 25)));
        assert_eq!(summary.period_end, Some(date(2024, 3, 14)));
        // 50 days back
        assert_eq!(summary.months, 2);
        assert_eq!(summary.avg_monthly_income, 2_500_000.0);
        assert_eq!(
            summary.period().as_deref(),
            Some("2024-01-25 sampai 2024-03-14 (2 bulan)")
        );
    }

    #[test]
    fn test_months_is_at_least_one() {
        assert_eq!(months_since(date(2024, 3, 15), date(2024, 3, 15)), 1);
        assert_eq!(months_since(date(2024, 3, 1), date(2024, 3, 15)), 1);
        assert_eq!(months_since(date(2024, 2, 14), date(2024, 3, 15)), 1);
        assert_eq!(months_since(date(2024, 2, 13), date(2024, 3, 15)), 2);
        // Entry dated after today
        assert_eq!(months_since(date(2024, 3, 20), date(2024, 3, 15)), 1);
    }

    #[test]
    fn test_category_breakdown_sorted() {
        let summary = SpendingSummary::from_entries(&sample(), date(2024, 3, 15));
        let categories: Vec<Category> = summary.by_category.iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![Category::Bills, Category::Food]);
        assert_eq!(summary.by_category[1].amount, 300_000.0);
        assert!((summary.by_category[0].percentage - 80.0).abs() < 1e-9);
        assert!((summary.by_category[1].percentage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_newest_first_and_limited() {
        let today = date(2024, 3, 31);
        let entries: Vec<LedgerEntry> = (1..=15)
            .map(|d| {
                entry(
                    10_000.0,
                    TransactionKind::Expense,
                    Category::Food,
                    "Jajan",
                    date(2024, 3, d),
                )
            })
            .collect();

        let summary = SpendingSummary::from_entries(&entries, today);
        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        assert_eq!(summary.recent[0].date, date(2024, 3, 15));
        assert_eq!(summary.recent[9].date, date(2024, 3, 6));
    }

    #[test]
    fn test_period_windows() {
        let today = date(2024, 3, 15);
        assert_eq!(Period::Today.start(today), Some(today));
        assert_eq!(Period::Week.start(today), Some(date(2024, 3, 8)));
        assert_eq!(Period::Month.start(today), Some(date(2024, 2, 14)));
        assert_eq!(Period::All.start(today), None);

        assert!(Period::Week.contains(date(2024, 3, 8), today));
        assert!(!Period::Week.contains(date(2024, 3, 7), today));
        assert!(Period::Today.contains(date(2024, 3, 16), today));
        assert!(!Period::Today.contains(date(2024, 3, 14), today));
        assert!(Period::All.contains(date(1999, 1, 1), today));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("week".parse::<Period>(), Ok(Period::Week));
        assert_eq!("Semua".parse::<Period>(), Ok(Period::All));
        assert!("year".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::All);
        assert_eq!(Period::Month.label(), "Bulan Ini (30 Hari)");
    }

    #[test]
    fn test_for_period_filters_totals_and_breakdown() {
        let today = date(2024, 3, 15);

        let week = SpendingSummary::for_period(&sample(), Period::Week, today);
        assert_eq!(week.transaction_count, 2);
        assert_eq!(week.total_income, 0.0);
        assert_eq!(week.balance, -300_000.0);
        assert_eq!(week.by_category.len(), 1);
        assert_eq!(week.by_category[0].category, Category::Food);

        // Window starts 2024-02-01; later-dated entries stay in
        let month = SpendingSummary::for_period(&sample(), Period::Month, date(2024, 3, 2));
        assert_eq!(month.transaction_count, 3);
        assert_eq!(month.total_income, 0.0);
        assert_eq!(month.total_expense, 1_500_000.0);

        let today_only = SpendingSummary::for_period(&sample(), Period::Today, today);
        assert_eq!(today_only.transaction_count, 0);

        let all = SpendingSummary::for_period(&sample(), Period::All, today);
        assert_eq!(all, SpendingSummary::from_entries(&sample(), today));
    }

    #[test]
    fn test_empty_ledger() {
        let summary = SpendingSummary::from_entries(&[], date(2024, 3, 15));
        assert_eq!(summary.months, 1);
        assert_eq!(summary.balance, 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.period().is_none());
    }

    #[test]
    fn test_render_brief() {
        let brief = SpendingSummary::from_entries(&sample(), date(2024, 3, 15)).render();
        assert!(brief.contains("Total transaksi: 4"));
        assert!(brief.contains("- Total Pemasukan: Rp 5.000.000"));
        assert!(brief.contains("- Bills: Rp 1.200.000 (80.0%)"));
        assert!(brief.contains("- 2024-03-14: Pengeluaran Rp 50.000 - Food (Makan siang)"));
    }

    #[tokio::test]
    async fn test_not_enough_data_skips_backend() {
        let mock = MockBackend::new();
        let entries = &sample()[..2];

        let result = recommend(&mock, entries, date(2024, 3, 15)).await.unwrap();
        match &result {
            Recommendation::NotEnoughData { have, need, message } => {
                assert_eq!(*have, 2);
                assert_eq!(*need, 3);
                assert!(message.contains("**1 transaksi lagi**"));
            }
            other => panic!("expected NotEnoughData, got {:?}", other),
        }
        assert!(!result.has_enough_data());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_advice_passes_brief_to_backend() {
        let mock = MockBackend::new();
        let result = recommend(&mock, &sample(), date(2024, 3, 15))
            .await
            .unwrap();

        assert!(result.has_enough_data());
        assert!(result.text().contains("Total transaksi: 4"));
        match mock.calls().as_slice() {
            [MockCall::Recommend { summary }] => assert!(summary.contains("RINGKASAN KEUANGAN")),
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_recommendation_error() {
        let mock = MockBackend::failing();
        let result = recommend(&mock, &sample(), date(2024, 3, 15)).await;
        assert!(matches!(result, Err(Error::Recommendation(_))));
    }
}
