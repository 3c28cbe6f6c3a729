//! Classification of a single claim result.

use crate::client::ClaimResponse;
use std::fmt;

/// Marker the faucet puts in `msg` when it has sent funds
pub const SUCCESS_MARKER: &str = "Txhash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Funds were sent; carries the faucet message with the transaction hash
    Success(String),
    /// Faucet answered but sent nothing (cooldown, already claimed, ...)
    Info(String),
    /// No response, or a response without `msg`
    Failed,
}

impl ClaimOutcome {
    pub fn classify(response: Option<&ClaimResponse>) -> Self {
        match response.and_then(|r| r.msg.as_deref()) {
            Some(msg) if msg.contains(SUCCESS_MARKER) => Self::Success(msg.to_string()),
            Some(msg) => Self::Info(msg.to_string()),
            None => Self::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for ClaimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(msg) => write!(f, "Success! {}", msg),
            Self::Info(msg) => write!(f, "Response received: {}", msg),
            Self::Failed => write!(f, "Failed to send request or invalid response."),
        }
    }
}
