//! Sign-in against the health backend
//!
//! Credentials are validated locally before any request. A backend that
//! cannot be reached (or answers with something undecodable) still lets
//! the user in, without a token.

use crate::backend::{BackendError, ChatBackend, LoginRequest};
use crate::store::{SharedStore, UserProfile};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if !EMAIL.is_match(&self.email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token issued and stored
    Authenticated,
    /// Backend unavailable; signed in locally without a token
    Offline,
}

pub async fn login<B: ChatBackend + ?Sized>(
    backend: &B,
    store: &SharedStore,
    credentials: &Credentials,
) -> Result<LoginOutcome, AuthError> {
    credentials.validate()?;

    let request = LoginRequest {
        email: credentials.email.clone(),
        password: credentials.password.clone(),
    };

    match backend.login(&request).await {
        Ok(reply) => {
            store.with(|s| {
                s.set_access_token(Some(reply.access_token));
                s.set_authenticated(true);
                if let Some(user) = reply.user {
                    s.set_user_profile(Some(UserProfile {
                        name: user.name.unwrap_or_default(),
                        email: user
                            .email
                            .filter(|e| !e.is_empty())
                            .unwrap_or_else(|| credentials.email.clone()),
                    }));
                }
            });
            tracing::info!("Signed in");
            Ok(LoginOutcome::Authenticated)
        }
        Err(BackendError::Rejected { message, .. }) => {
            Err(AuthError::Rejected(message.unwrap_or_else(|| LOGIN_FAILED.to_string())))
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Backend unavailable, signing in offline");
            store.with(|s| s.set_authenticated(true));
            Ok(LoginOutcome::Offline)
        }
    }
}

pub fn logout(store: &SharedStore) {
    store.with(|s| {
        s.set_access_token(None);
        s.set_authenticated(false);
        s.set_user_profile(None);
    });
    tracing::info!("Signed out");
}
