//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::NaiveDate;
use clap::Parser;

use catat_core::{
    AIClient, Category, Interpretation, Interpreter, MockBackend, Period, ResolvedTransaction,
    TransactionKind,
};

use crate::cli::{Cli, Commands, PromptsAction};
use crate::commands::{self, truncate, SessionCommand};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mock_interpreter() -> Interpreter {
    Interpreter::new(AIClient::Mock(MockBackend::new()))
}

fn write_ledger(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn rent() -> ResolvedTransaction {
    ResolvedTransaction {
        amount: 1_200_000.0,
        kind: TransactionKind::Expense,
        category: Category::Bills,
        description: "Bayar kos".to_string(),
        date: date(2024, 3, 14),
        day_offset: Some(1),
        day_of_month: None,
        when: "kemarin".to_string(),
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_args() {
    let cli = Cli::try_parse_from([
        "catat",
        "parse",
        "bayar makan 50rb",
        "--today",
        "2024-03-15",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Parse { text, today, json } => {
            assert_eq!(text, "bayar makan 50rb");
            assert_eq!(today, Some(date(2024, 3, 15)));
            assert!(json);
        }
        _ => panic!("expected parse command"),
    }
}

#[test]
fn test_date_args_accept_negative_offset() {
    let cli = Cli::try_parse_from(["catat", "date", "--days-ago", "-2"]).unwrap();
    match cli.command {
        Commands::Date { days_ago, .. } => assert_eq!(days_ago, Some(-2)),
        _ => panic!("expected date command"),
    }
}

#[test]
fn test_invalid_today_rejected() {
    assert!(Cli::try_parse_from(["catat", "parse", "x", "--today", "15/03/2024"]).is_err());
}

#[test]
fn test_summary_period_arg() {
    let cli = Cli::try_parse_from(["catat", "summary", "ledger.json", "--period", "week"]).unwrap();
    match cli.command {
        Commands::Summary { period, advise, .. } => {
            assert_eq!(period, Period::Week);
            assert!(!advise);
        }
        _ => panic!("expected summary command"),
    }

    let cli = Cli::try_parse_from(["catat", "summary", "ledger.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Summary {
            period: Period::All,
            ..
        }
    ));

    assert!(Cli::try_parse_from(["catat", "summary", "ledger.json", "--period", "year"]).is_err());
}

#[test]
fn test_global_flags() {
    let cli = Cli::try_parse_from([
        "catat", "prompts", "show", "recommend", "-v", "--model", "qwen2.5",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.model.as_deref(), Some("qwen2.5"));
    assert!(matches!(
        cli.command,
        Commands::Prompts {
            action: Some(PromptsAction::Show { .. })
        }
    ));
}

// ========== Formatting Tests ==========

#[test]
fn test_format_single_transaction() {
    let outcome = Interpretation::SingleTransaction { transaction: rent() };
    let text = commands::format_interpretation(&outcome);
    assert!(text.contains("Pengeluaran Rp 1.200.000"));
    assert!(text.contains("Bayar kos (kemarin, 2024-03-14)"));
}

#[test]
fn test_format_multiple_transactions() {
    let outcome = Interpretation::MultipleTransactions {
        transactions: vec![rent(), rent()],
    };
    let text = commands::format_interpretation(&outcome);
    assert!(text.starts_with("✅ 2 transaksi tercatat:"));
    assert!(text.contains("\n   2. "));
}

#[test]
fn test_format_reply() {
    let outcome = Interpretation::Unrecognized {
        message: "Coba lagi ya".to_string(),
    };
    assert_eq!(commands::format_interpretation(&outcome), "Coba lagi ya");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Bayar kos", 20), "Bayar kos");
    assert_eq!(truncate("Belanja bulanan di pasar", 10), "Belanja...");
    // Multi-byte characters are not split
    assert_eq!(truncate("🍔🍔🍔🍔🍔🍔", 5), "🍔🍔...");
}

#[test]
fn test_session_commands() {
    assert_eq!(SessionCommand::parse("/ringkasan"), Some(SessionCommand::Summary));
    assert_eq!(SessionCommand::parse(" /SARAN "), Some(SessionCommand::Advice));
    assert_eq!(SessionCommand::parse("/keluar"), Some(SessionCommand::Quit));
    assert_eq!(SessionCommand::parse("bayar makan 50rb"), None);
}

// ========== Command Tests ==========

#[tokio::test]
async fn test_cmd_parse_with_mock_backend() {
    let interpreter = mock_interpreter();
    let result =
        commands::cmd_parse(&interpreter, "kemarin bayar kos 1,2 juta", date(2024, 3, 15), false)
            .await;
    assert!(result.is_ok());

    let result =
        commands::cmd_parse(&interpreter, "kemarin bayar kos 1,2 juta", date(2024, 3, 15), true)
            .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_parse_without_backend_fails() {
    let interpreter = Interpreter::without_backend();
    let result =
        commands::cmd_parse(&interpreter, "bayar makan 50rb", date(2024, 3, 15), false).await;
    assert!(result.is_err());

    // Casual chat never needs a backend
    let result = commands::cmd_parse(&interpreter, "halo", date(2024, 3, 15), false).await;
    assert!(result.is_ok());
}

#[test]
fn test_cmd_date() {
    assert!(commands::cmd_date(Some(1), None, date(2024, 3, 15)).is_ok());
    assert!(commands::cmd_date(None, Some(25), date(2024, 1, 10)).is_ok());
    assert!(commands::cmd_date(None, Some(32), date(2024, 1, 10)).is_err());
    assert!(commands::cmd_date(Some(-36_500), None, date(2024, 3, 15)).is_ok());
    assert!(commands::cmd_date(Some(200_000_000_000), None, date(2024, 3, 15)).is_err());
}

#[test]
fn test_load_ledger() {
    let file = write_ledger(
        r#"[
            {"amount": 50000, "kind": "expense", "category": "Food", "description": "Makan", "date": "2024-03-14"},
            {"amount": 5000000, "kind": "income", "category": "Salary", "date": "2024-03-01"}
        ]"#,
    );

    let entries = commands::load_ledger(file.path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].description, "");
}

#[test]
fn test_load_ledger_invalid() {
    let file = write_ledger(r#"{"not": "an array"}"#);
    assert!(commands::load_ledger(file.path()).is_err());
    assert!(commands::load_ledger(std::path::Path::new("/nonexistent/ledger.json")).is_err());
}

#[tokio::test]
async fn test_cmd_summary_with_advice() {
    let file = write_ledger(
        r#"[
            {"amount": 50000, "kind": "expense", "category": "Food", "description": "Makan", "date": "2024-03-14"},
            {"amount": 1200000, "kind": "expense", "category": "Bills", "description": "Kos", "date": "2024-03-02"},
            {"amount": 5000000, "kind": "income", "category": "Salary", "description": "Gaji", "date": "2024-03-01"}
        ]"#,
    );
    let mock = MockBackend::new();
    let interpreter = Interpreter::new(AIClient::Mock(mock.clone()));

    let result =
        commands::cmd_summary(&interpreter, file.path(), Period::All, true, date(2024, 3, 15))
            .await;
    assert!(result.is_ok());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_cmd_summary_with_period() {
    let file = write_ledger(
        r#"[
            {"amount": 50000, "kind": "expense", "category": "Food", "description": "Makan", "date": "2024-03-14"},
            {"amount": 5000000, "kind": "income", "category": "Salary", "description": "Gaji", "date": "2024-01-01"}
        ]"#,
    );
    let mock = MockBackend::new();
    let interpreter = Interpreter::new(AIClient::Mock(mock.clone()));

    let result =
        commands::cmd_summary(&interpreter, file.path(), Period::Week, false, date(2024, 3, 15))
            .await;
    assert!(result.is_ok());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_cmd_summary_short_ledger_skips_backend() {
    let file = write_ledger("[]");
    let interpreter = Interpreter::without_backend();

    let result =
        commands::cmd_summary(&interpreter, file.path(), Period::All, true, date(2024, 3, 15))
            .await;
    assert!(result.is_ok());
}

#[test]
fn test_cmd_prompts() {
    assert!(commands::cmd_prompts_list().is_ok());
    assert!(commands::cmd_prompts_show("parse_transaction").is_ok());
    assert!(commands::cmd_prompts_show("unknown_prompt").is_ok());
    assert!(commands::cmd_prompts_path().is_ok());
}

#[tokio::test]
async fn test_cmd_status() {
    assert!(commands::cmd_status(&mock_interpreter()).await.is_ok());
    assert!(commands::cmd_status(&Interpreter::without_backend()).await.is_ok());
}
