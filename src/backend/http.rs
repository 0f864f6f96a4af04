//! reqwest implementation of the health backend

use super::types::{error_message, ChatReply, ChatRequest, LoginReply, LoginRequest};
use super::{BackendError, ChatBackend};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// HTTP client for the `/chat` and `/auth/login` endpoints
pub struct HttpBackend {
    client: Client,
    base_url: String,
    chat_url: String,
    login_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            chat_url: config.endpoint("/chat"),
            login_url: config.endpoint("/auth/login"),
        })
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value), BackendError> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::from_send(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Unreachable(format!("Failed to read response: {e}")))?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            BackendError::InvalidResponse(format!("HTTP {status}: {e} - body: {text}"))
        })?;

        Ok((status, body))
    }

    /// Pull `data` out of a success envelope, or classify the rejection
    fn unwrap_data<T: DeserializeOwned>(
        status: StatusCode,
        body: &Value,
        accept: impl FnOnce(&T) -> bool,
    ) -> Result<T, BackendError> {
        if status.is_success() {
            let data = body
                .get("data")
                .cloned()
                .and_then(|data| serde_json::from_value::<T>(data).ok())
                .filter(|data| accept(data));
            if let Some(data) = data {
                return Ok(data);
            }
        }
        Err(BackendError::rejected(status.as_u16(), error_message(body)))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatReply, BackendError> {
        let (status, body) = self.post_json(&self.chat_url, request, token).await?;
        Self::unwrap_data(status, &body, |reply: &ChatReply| !reply.response.is_empty())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, BackendError> {
        let (status, body) = self.post_json(&self.login_url, request, None).await?;
        Self::unwrap_data(status, &body, |reply: &LoginReply| {
            !reply.access_token.is_empty()
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
