//! Wire types for the `/chat` and `/auth/login` endpoints
//!
//! Responses are wrapped as `{ "success", "data", "message" }`; error
//! bodies may carry `message` or `error` instead of `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend mode sent for every workspace tool
pub const BACKEND_MODE: &str = "health";

/// `POST /chat` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub mode: String,
    pub language: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            mode: BACKEND_MODE.to_string(),
            language: language.into(),
        }
    }
}

/// Successful `/chat` payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// 0..1
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

impl ChatReply {
    /// Confidence as a rounded percentage
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100 first
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Whether any risk flag calls for the emergency overlay
    pub fn is_emergency(&self) -> bool {
        self.risk_flags.iter().any(|flag| {
            let flag = flag.to_lowercase();
            flag.contains("emergency") || flag.contains("crisis")
        })
    }
}

/// `POST /auth/login` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful `/auth/login` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// Server-provided `message`, else `error`
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(String::from)
}
