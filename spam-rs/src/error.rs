//! Error types for spam-rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// Spam filter error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// Caller or data error: bad label file, unknown label, empty corpus
    #[error("Input error: {0}")]
    Input(String),

    /// Degenerate division (empty token sequence, empty confusion matrix)
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// IO error with the offending path
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tokenizer pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl SpamError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpamError::Io {
            path: path.into(),
            source,
        }
    }
}
