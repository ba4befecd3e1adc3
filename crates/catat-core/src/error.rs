//! Error types for Catat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The extraction backend failed or returned output that does not fit the
    /// schema. The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Extraction(String),

    #[error("Recommendation error: {0}")]
    Recommendation(String),
}

impl Error {
    /// Whether this error should be shown to the user directly
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Extraction(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
