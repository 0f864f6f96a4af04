//! Mock implementations for testing
//!
//! These let the workspace and login flows run without a network or timers.

use super::Scheduler;
use crate::backend::{BackendError, ChatBackend, ChatReply, ChatRequest, LoginReply, LoginRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Backend
// ============================================================================

/// Backend that answers from queues and records every request
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<ChatReply, BackendError>>>,
    logins: Mutex<VecDeque<Result<LoginReply, BackendError>>>,
    delays: Mutex<VecDeque<Duration>>,
    /// (request, bearer token) for each chat call
    pub requests: Mutex<Vec<(ChatRequest, Option<String>)>>,
    pub login_requests: Mutex<Vec<LoginRequest>>,
    /// When set, chat calls wait for a permit before answering
    gate: Option<Arc<Notify>>,
    /// Notified when a chat request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            logins: Mutex::new(VecDeque::new()),
            delays: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            login_requests: Mutex::new(Vec::new()),
            gate: None,
            request_started: Arc::new(Notify::new()),
        }
    }

    /// Hold every chat call until the returned handle is notified
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let backend = Self {
            gate: Some(gate.clone()),
            ..Self::new()
        };
        (backend, gate)
    }

    pub fn queue_reply(&self, response: &str, confidence: f64, risk_flags: &[&str]) {
        self.replies.lock().unwrap().push_back(Ok(ChatReply {
            response: response.to_string(),
            confidence,
            risk_flags: risk_flags.iter().map(ToString::to_string).collect(),
        }));
    }

    pub fn queue_error(&self, error: BackendError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Delay applied to the next chat call
    pub fn queue_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub fn queue_login(&self, result: Result<LoginReply, BackendError>) {
        self.logins.lock().unwrap().push_back(result);
    }

    pub fn recorded_requests(&self) -> Vec<(ChatRequest, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> Result<ChatReply, BackendError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), token.map(String::from)));
        self.request_started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unreachable("No mock reply queued".into())))
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, BackendError> {
        self.login_requests.lock().unwrap().push(request.clone());
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unreachable("No mock login queued".into())))
    }

    fn base_url(&self) -> &str {
        "http://mock.backend"
    }
}

// ============================================================================
// Immediate Scheduler
// ============================================================================

/// Scheduler that records requested delays and only yields
#[derive(Default)]
pub struct ImmediateScheduler {
    pub delays: Mutex<Vec<Duration>>,
}

impl ImmediateScheduler {
    pub fn recorded_delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for ImmediateScheduler {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}
