//! Catat Core Library
//!
//! Shared functionality for the Catat chat-driven finance tracker:
//! - Message interpreter (casual chat, validity, multiplicity, date resolution)
//! - Indonesian amount notation ("50rb", "1,2 juta")
//! - Pluggable AI backends for structured extraction (Gemini, Ollama, OpenAI-compatible)
//! - Prompt library for customizable AI prompts
//! - Spending summaries with period filters, and budgeting advice
//! - Manual entry checks for the fallback form

pub mod ai;
pub mod amount;
pub mod error;
pub mod interpreter;
pub mod manual;
pub mod models;
pub mod prompts;
pub mod summary;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, GeminiBackend, MockBackend, MockCall, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use amount::{find_amounts, format_rupiah, parse_amount};
pub use error::{Error, Result};
pub use interpreter::{resolve_transaction, Interpreter, ReplyPicker};
pub use manual::validate_manual_entry;
pub use models::{
    Category, ExtractedTransaction, ExtractionSchema, Interpretation, LedgerEntry,
    ResolvedTransaction, TransactionKind,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use summary::{Period, Recommendation, SpendingSummary, MIN_TRANSACTIONS_FOR_ADVICE};
