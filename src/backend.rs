//! Health backend abstraction
//!
//! The backend behind `/chat` and `/auth/login` is an opaque collaborator;
//! everything above this module talks to it through `ChatBackend`.

mod error;
mod http;
pub mod types;

pub use error::BackendError;
pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, LoginReply, LoginRequest, LoginUser};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the health backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat message. No retry, no cancellation.
    async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatReply, BackendError>;

    /// Exchange credentials for an access token
    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, BackendError>;

    /// Base URL, used in user-facing fallback messages
    fn base_url(&self) -> &str;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatReply, BackendError> {
        (**self).chat(request, token).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, BackendError> {
        (**self).login(request).await
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// Logging wrapper for backends
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B: ChatBackend> LoggingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: ChatBackend> ChatBackend for LoggingBackend<B> {
    async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatReply, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.chat(request, token).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    language = %request.language,
                    authenticated = token.is_some(),
                    confidence = reply.confidence,
                    risk_flags = reply.risk_flags.len(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind(),
                    error = %e,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.login(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => tracing::info!(duration_ms = %duration.as_millis(), "Login succeeded"),
            Err(e) => tracing::warn!(
                duration_ms = %duration.as_millis(),
                kind = e.kind(),
                error = %e,
                "Login failed"
            ),
        }

        result
    }

    fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}
