// ABOUTME: Error types for the deck editor
// ABOUTME: Covers local state validation as well as remote service and file failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Index {index} is out of range (length {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Cannot delete the last remaining slide")]
    CannotDeleteLast,

    #[error("Failed to reach remote service: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Remote service returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid deck data: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Markdown outline error: {0}")]
    MarkdownError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<url::ParseError> for DeckError {
    fn from(err: url::ParseError) -> Self {
        DeckError::ConfigError(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
