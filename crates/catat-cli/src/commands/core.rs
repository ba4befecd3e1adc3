//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `build_interpreter` - Shared utility to build the interpreter from the environment
//! - `cmd_parse` - Interpret one message
//! - `cmd_date` - Resolve a relative date

use anyhow::{Context, Result};
use chrono::NaiveDate;

use catat_core::ai::AIClient;
use catat_core::interpreter::dates::MAX_DAY_OFFSET;
use catat_core::interpreter::{describe_offset, resolve_date};
use catat_core::{format_rupiah, Interpretation, Interpreter, ResolvedTransaction};

/// Build the interpreter from environment variables, applying `--model`
pub fn build_interpreter(model: Option<&str>) -> Interpreter {
    match AIClient::from_env() {
        Some(client) => {
            let client = match model {
                Some(m) => client.with_model(m),
                None => client,
            };
            Interpreter::new(client)
        }
        None => Interpreter::without_backend(),
    }
}

/// `--today` if given, else the local date
pub fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// One confirmation line for a resolved transaction
pub fn format_transaction(tx: &ResolvedTransaction) -> String {
    format!(
        "{} {} {}  {} ({}, {})",
        tx.category.icon(),
        tx.kind.label(),
        format_rupiah(tx.amount),
        tx.description,
        tx.when,
        tx.date
    )
}

/// Human-readable rendering of an interpretation outcome
pub fn format_interpretation(outcome: &Interpretation) -> String {
    match outcome {
        Interpretation::CasualReply { message } | Interpretation::Unrecognized { message } => {
            message.clone()
        }
        Interpretation::SingleTransaction { transaction } => {
            format!("✅ Tercatat:\n   {}", format_transaction(transaction))
        }
        Interpretation::MultipleTransactions { transactions } => {
            let mut out = format!("✅ {} transaksi tercatat:", transactions.len());
            for (i, tx) in transactions.iter().enumerate() {
                out.push_str(&format!("\n   {}. {}", i + 1, format_transaction(tx)));
            }
            out
        }
    }
}

pub async fn cmd_parse(
    interpreter: &Interpreter,
    text: &str,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let outcome = interpreter.interpret_on(text, today).await?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?;
        println!("{}", rendered);
    } else {
        println!("{}", format_interpretation(&outcome));
    }

    Ok(())
}

pub fn cmd_date(days_ago: Option<i64>, day_of_month: Option<u32>, today: NaiveDate) -> Result<()> {
    if let Some(day) = day_of_month {
        if !(1..=31).contains(&day) {
            anyhow::bail!("--day-of-month must be between 1 and 31 (got {})", day);
        }
    }

    if let Some(days) = days_ago.filter(|d| d.unsigned_abs() > MAX_DAY_OFFSET as u64) {
        anyhow::bail!(
            "--days-ago must be within ±{} (got {})",
            MAX_DAY_OFFSET,
            days
        );
    }

    let date = resolve_date(today, days_ago, day_of_month);
    println!("{}  ({})", date, describe_offset(days_ago, day_of_month));

    Ok(())
}
