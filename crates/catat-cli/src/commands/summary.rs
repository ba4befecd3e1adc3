//! Ledger summary command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use catat_core::summary::{self, insufficient_history};
use catat_core::{format_rupiah, Interpreter, LedgerEntry, Period, SpendingSummary};

use super::truncate;

/// Read a JSON array of ledger entries
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid ledger file {}", path.display()))
}

pub async fn cmd_summary(
    interpreter: &Interpreter,
    file: &Path,
    period: Period,
    advise: bool,
    today: NaiveDate,
) -> Result<()> {
    let entries = load_ledger(file)?;
    let overview = SpendingSummary::for_period(&entries, period, today);

    println!();
    println!("📊 Ringkasan Keuangan: {}", period.label());
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Transaksi: {}", overview.transaction_count);
    if let Some(period) = overview.period() {
        println!("   Periode: {}", period);
    }
    println!("   Pemasukan: {}", format_rupiah(overview.total_income));
    println!("   Pengeluaran: {}", format_rupiah(overview.total_expense));
    println!("   Saldo: {}", format_rupiah(overview.balance));

    if !overview.by_category.is_empty() {
        println!();
        println!("   {:<16} {:>16} {:>7}", "KATEGORI", "JUMLAH", "%");
        for total in &overview.by_category {
            println!(
                "   {} {:<13} {:>16} {:>6.1}%",
                total.category.icon(),
                total.category.as_str(),
                format_rupiah(total.amount),
                total.percentage
            );
        }
    }

    if !overview.recent.is_empty() {
        println!();
        println!("   Terakhir:");
        for entry in &overview.recent {
            println!(
                "   {}  {:<12} {:>16}  {}",
                entry.date,
                entry.kind.label(),
                format_rupiah(entry.amount),
                truncate(&entry.description, 30)
            );
        }
    }
    println!();

    if !advise {
        return Ok(());
    }

    let recommendation = match insufficient_history(&entries) {
        Some(answer) => answer,
        None => {
            let client = interpreter
                .client()
                .context("AI backend not configured (set GEMINI_API_KEY or AI_BACKEND)")?;
            summary::recommend(client, &entries, today).await?
        }
    };
    println!("{}", recommendation.text());

    Ok(())
}
