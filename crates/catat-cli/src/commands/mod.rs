//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `chat` - Interactive chat session
//! - `core` - Parse and date commands, shared utilities (build_interpreter)
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command
//! - `status` - Backend status command
//! - `summary` - Ledger summary and advice

pub mod chat;
pub mod core;
pub mod prompts;
pub mod serve;
pub mod status;
pub mod summary;

// Re-export command functions for main.rs
pub use chat::*;
pub use core::*;
pub use prompts::*;
pub use serve::*;
pub use status::*;
pub use summary::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
