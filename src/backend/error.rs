//! Backend error types

use thiserror::Error;

/// Failure talking to the health backend, classified by how the chat
/// should recover from it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never got an HTTP response
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Non-OK status, or an OK response without the expected payload
    #[error("Request rejected (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        /// Server-provided `message` or `error` field
        message: Option<String>,
    },

    /// The body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Short classification for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Rejected { .. } => "rejected",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }

    pub(crate) fn from_send(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unreachable(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::Unreachable(format!("Connection failed: {e}"))
        } else {
            Self::Unreachable(format!("Request failed: {e}"))
        }
    }
}
