//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use catat_core::Period;

/// Catat - Record money by chatting
#[derive(Parser)]
#[command(name = "catat")]
#[command(about = "Chat-driven personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the backend model (e.g. gemini-1.5-flash, qwen2.5:7b)
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpret one chat message
    Parse {
        /// The message, e.g. "kemarin bayar kos 1,2 juta"
        text: String,

        /// Reference date for relative phrases (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the raw JSON outcome
        #[arg(long)]
        json: bool,
    },

    /// Interactive chat session
    ///
    /// Type transactions the way you would text a friend. Recorded
    /// transactions are kept for the session; /ringkasan shows a summary,
    /// /saran asks for advice, /keluar quits.
    Chat {
        /// Reference date for relative phrases (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Resolve a relative day or day-of-month to a calendar date
    Date {
        /// Days before today (negative for the future)
        #[arg(long, allow_negative_numbers = true)]
        days_ago: Option<i64>,

        /// Day of the current (or previous) month
        #[arg(long)]
        day_of_month: Option<u32>,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Summarize a ledger file and optionally ask for advice
    Summary {
        /// JSON file with an array of {amount, kind, category, description, date}
        file: PathBuf,

        /// Only summarize entries in this window (today, week, month, all)
        #[arg(long, default_value = "all")]
        period: Period,

        /// Ask the AI backend for budgeting advice (always over the whole ledger)
        #[arg(long)]
        advise: bool,

        /// Reference date for month counting (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show backend configuration and connectivity
    Status,

    /// Manage AI prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., parse_transaction, recommend)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
