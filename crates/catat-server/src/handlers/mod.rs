//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod health;
pub mod manual;
pub mod parse;
pub mod summary;

// Re-export all handlers for use in router
pub use health::*;
pub use manual::*;
pub use parse::*;
pub use summary::*;
