//! Interactive chat session

use anyhow::Result;
use chrono::NaiveDate;
use tokio::io::{AsyncBufReadExt, BufReader};

use catat_core::summary;
use catat_core::{Error, Interpreter, LedgerEntry, SpendingSummary};

use super::core::format_interpretation;

/// Session commands recognized in the chat loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Summary,
    Advice,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "/ringkasan" | "/summary" => Some(Self::Summary),
            "/saran" | "/advice" => Some(Self::Advice),
            "/keluar" | "/quit" | "/exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub async fn cmd_chat(interpreter: &Interpreter, today: NaiveDate) -> Result<()> {
    println!("💬 Catat - ketik transaksimu, misal \"bayar makan 50rb\"");
    println!("   /ringkasan untuk ringkasan, /saran untuk saran, /keluar untuk keluar");
    if interpreter.client().is_none() {
        println!("   ⚠️  AI backend not configured - only small talk will work");
    }
    println!();

    let mut ledger: Vec<LedgerEntry> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match SessionCommand::parse(line) {
            Some(SessionCommand::Quit) => break,
            Some(SessionCommand::Summary) => {
                let overview = SpendingSummary::from_entries(&ledger, today);
                println!("{}", overview.render());
            }
            Some(SessionCommand::Advice) => match interpreter.client() {
                Some(client) => match summary::recommend(client, &ledger, today).await {
                    Ok(recommendation) => println!("{}\n", recommendation.text()),
                    Err(e) => println!("❌ {}\n", e),
                },
                None => match summary::insufficient_history(&ledger) {
                    Some(answer) => println!("{}\n", answer.text()),
                    None => println!("❌ AI backend not configured\n"),
                },
            },
            None => match interpreter.interpret_on(line, today).await {
                Ok(outcome) => {
                    ledger.extend(outcome.transactions().iter().map(LedgerEntry::from));
                    println!("{}\n", format_interpretation(&outcome));
                }
                // Extraction messages are meant for the user
                Err(Error::Extraction(message)) => println!("❌ {}\n", message),
                Err(e) => println!("❌ Error: {}\n", e),
            },
        }
    }

    if !ledger.is_empty() {
        println!("👋 {} transaksi dicatat di sesi ini.", ledger.len());
    }

    Ok(())
}
