//! Advice error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while requesting advice
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Advice service error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    #[error("API key not set: environment variable {0} is empty or missing")]
    MissingApiKey(String),

    #[error("Advice task failed: {0}")]
    TaskFailed(String),
}

impl AdviceError {
    /// Whether asking again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AdviceError::Api { status, .. } => *status == 429 || *status >= 500,
            AdviceError::Network(_) => true,
            AdviceError::Timeout(_) => true,
            AdviceError::InvalidResponse(_) => true,
            AdviceError::Prompt(_) => false,
            AdviceError::MissingApiKey(_) => false,
            AdviceError::TaskFailed(_) => true,
        }
    }
}
