//! Integration tests for catat-core
//!
//! These tests exercise the full chat → interpret → ledger → advice workflow
//! against the offline mock backend.

use catat_core::{
    interpreter::FixedPicker,
    summary::{self, Recommendation},
    AIClient, Category, Error, ExtractionSchema, Interpretation, Interpreter, LedgerEntry,
    MockBackend, MockCall, SpendingSummary, TransactionKind,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 3, 15)
}

/// A short conversation: one greeting, one noise line, four transactions
fn conversation() -> &'static [&'static str] {
    &[
        "halo",
        "gajian 5 juta",
        "kemarin bayar kos 1,2 juta",
        "besok bayar listrik 150rb dan lusa bayar internet 300rb",
        "ok",
    ]
}

// =============================================================================
// Interpreter Workflow
// =============================================================================

#[tokio::test]
async fn test_conversation_to_ledger() {
    let mock = MockBackend::new();
    let interpreter = Interpreter::new(AIClient::Mock(mock.clone())).with_picker(FixedPicker(0));

    let mut ledger: Vec<LedgerEntry> = Vec::new();
    let mut replies = 0;

    for message in conversation() {
        let outcome = interpreter
            .interpret_on(message, today())
            .await
            .expect("interpretation should succeed");

        if outcome.message().is_some() {
            replies += 1;
        }
        ledger.extend(outcome.transactions().iter().map(LedgerEntry::from));
    }

    assert_eq!(replies, 2);
    assert_eq!(ledger.len(), 4);

    // Only the transaction-looking messages reached the backend
    assert_eq!(
        mock.requested_schemas(),
        vec![
            ExtractionSchema::Single,
            ExtractionSchema::Single,
            ExtractionSchema::Multi
        ]
    );

    let salary = &ledger[0];
    assert_eq!(salary.kind, TransactionKind::Income);
    assert_eq!(salary.category, Category::Salary);
    assert_eq!(salary.date, today());

    let rent = &ledger[1];
    assert_eq!(rent.amount, 1_200_000.0);
    assert_eq!(rent.date, date(2024, 3, 14));

    assert_eq!(ledger[2].date, date(2024, 3, 16));
    assert_eq!(ledger[3].date, date(2024, 3, 17));
}

#[tokio::test]
async fn test_outcome_serializes_with_type_tag() {
    let interpreter = Interpreter::new(AIClient::mock());

    let outcome = interpreter
        .interpret_on("kemarin bayar kos 1,2 juta", today())
        .await
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["type"], "single_transaction");
    assert_eq!(json["transaction"]["category"], "Bills");
    assert_eq!(json["transaction"]["kind"], "expense");
    assert_eq!(json["transaction"]["date"], "2024-03-14");
    assert_eq!(json["transaction"]["dayOffset"], 1);
    assert_eq!(json["transaction"]["when"], "kemarin");
}

#[tokio::test]
async fn test_scripted_backend_output_is_validated() {
    let mock = MockBackend::with_responses([
        // Legacy field names are accepted
        r#"{"amount": 75000, "type": "expense", "category": "food", "description": "Makan malam", "daysAgo": 2}"#,
        // Unknown category is rejected
        r#"{"amount": 75000, "kind": "expense", "category": "Groceries", "description": "Sayur"}"#,
    ]);
    let interpreter = Interpreter::new(AIClient::Mock(mock));

    let first = interpreter
        .interpret_on("makan malam 75rb", today())
        .await
        .unwrap();
    let tx = &first.transactions()[0];
    assert_eq!(tx.category, Category::Food);
    assert_eq!(tx.date, date(2024, 3, 13));
    assert_eq!(tx.when, "2 hari lalu");

    let second = interpreter.interpret_on("beli sayur 75rb", today()).await;
    assert!(matches!(second, Err(Error::Extraction(_))));
}

#[tokio::test]
async fn test_concurrent_interpretations_share_interpreter() {
    let mock = MockBackend::new();
    let interpreter = Interpreter::new(AIClient::Mock(mock.clone()));

    let tasks: Vec<_> = ["bayar makan 50rb", "isi bensin 100rb", "nonton bioskop 60rb"]
        .into_iter()
        .map(|text| {
            let interpreter = interpreter.clone();
            tokio::spawn(async move { interpreter.interpret_on(text, today()).await })
        })
        .collect();

    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.transactions().len(), 1);
    }
    assert_eq!(mock.calls().len(), 3);
}

// =============================================================================
// Summary & Advice Workflow
// =============================================================================

#[tokio::test]
async fn test_ledger_to_advice() {
    let mock = MockBackend::new();
    let interpreter = Interpreter::new(AIClient::Mock(mock.clone()));

    let mut ledger: Vec<LedgerEntry> = Vec::new();
    for message in &conversation()[1..4] {
        let outcome = interpreter.interpret_on(message, today()).await.unwrap();
        ledger.extend(outcome.transactions().iter().map(LedgerEntry::from));
    }

    let overview = SpendingSummary::from_entries(&ledger, today());
    assert_eq!(overview.total_income, 5_000_000.0);
    assert_eq!(overview.total_expense, 1_650_000.0);
    assert_eq!(overview.by_category[0].category, Category::Bills);

    let recommendation = summary::recommend(&AIClient::Mock(mock.clone()), &ledger, today())
        .await
        .unwrap();
    assert!(matches!(recommendation, Recommendation::Advice { .. }));

    let last = mock.calls().pop().unwrap();
    match last {
        MockCall::Recommend { summary } => {
            assert!(summary.contains("Total transaksi: 4"));
            assert!(summary.contains("Saldo: Rp 3.350.000"));
        }
        other => panic!("expected a recommend call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_advice_requires_history() {
    let mock = MockBackend::new();
    let ledger = vec![LedgerEntry {
        amount: 50_000.0,
        kind: TransactionKind::Expense,
        category: Category::Food,
        description: "Makan siang".to_string(),
        date: today(),
    }];

    let recommendation = summary::recommend(&mock, &ledger, today()).await.unwrap();
    assert!(!recommendation.has_enough_data());
    assert!(recommendation.text().contains("**1 transaksi**"));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_interpretation_variants_expose_messages() {
    let reply = Interpretation::CasualReply {
        message: "Halo!".to_string(),
    };
    assert_eq!(reply.message(), Some("Halo!"));
    assert!(reply.transactions().is_empty());
}
