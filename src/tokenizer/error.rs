//! Tokenizer error types.

use thiserror::Error;

/// Tokenizer errors
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Tokenizer must be trained before encoding or decoding")]
    NotTrained,

    #[error("Malformed tokenizer snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TokenizerError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }
}

impl From<serde_json::Error> for TokenizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedSnapshot(err.to_string())
    }
}

/// Result type for tokenizer operations
pub type Result<T> = std::result::Result<T, TokenizerError>;
