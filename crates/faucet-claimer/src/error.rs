//! Error handling for the faucet claimer.

use thiserror::Error;

/// Faucet claimer error types
#[derive(Error, Debug)]
pub enum ClaimerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Faucet returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input closed before an address was entered")]
    InputClosed,
}

/// Result type alias for claimer operations
pub type ClaimerResult<T> = Result<T, ClaimerError>;
