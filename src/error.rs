//! Error types for promptllm
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in promptllm
#[derive(Debug, Error)]
pub enum PromptError {
    /// Missing or invalid configuration (e.g. no API key)
    #[error("{0}")]
    Configuration(String),

    /// Prompt template not found
    #[error("Prompt file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Non-2xx response or transport failure
    #[error("{}", request_failed_message(.status, .detail))]
    RequestFailed { status: Option<u16>, detail: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn request_failed_message(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("OpenRouter request failed ({}): {}", code, detail),
        None => format!("OpenRouter request failed: {}", detail),
    }
}

impl PromptError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, PromptError::Configuration(_))
    }

    /// True for a missing prompt template and for NotFound IO errors
    pub fn is_not_found(&self) -> bool {
        match self {
            PromptError::NotFound(_) => true,
            PromptError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn is_request_failed(&self) -> bool {
        matches!(self, PromptError::RequestFailed { .. })
    }

    /// HTTP status carried by a failed request, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PromptError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for promptllm operations
pub type Result<T> = std::result::Result<T, PromptError>;
