//! Chat workspace controller
//!
//! Sending a message appends the user bubble immediately and queues the
//! reply on a per-session worker, so replies within one session arrive in
//! send order while different sessions proceed independently.

mod route;
mod scheduler;

#[cfg(test)]
pub mod testing;

pub use route::{parse_severity, route, Capture, Route};
pub use route::{DURATION_PROMPT, GREETING_PROMPT, OTHER_SYMPTOMS_PROMPT, SEVERITY_PROMPT};
pub use scheduler::{Scheduler, TokioScheduler};

use crate::attachment::{compose_content, ImageAttachment};
use crate::backend::{BackendError, ChatBackend, ChatRequest};
use crate::store::{ChatIntakeStep, ChatMessage, ChatMode, ChatSession, InsightsUpdate, SessionId, SharedStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Pause before a scripted interview prompt appears
pub const SCRIPTED_REPLY_DELAY: Duration = Duration::from_millis(800);

pub const GENERIC_APOLOGY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No active chat session")]
    NoActiveSession,
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// What the user submitted from the input bar
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub text: String,
    pub attachment: Option<ImageAttachment>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: ImageAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Handle to a queued reply
#[derive(Debug)]
pub struct PendingReply {
    done: oneshot::Receiver<()>,
}

impl PendingReply {
    /// Wait until the reply (or its fallback) has been appended
    pub async fn finished(self) {
        // A dropped sender means the worker went away with the session
        let _ = self.done.await;
    }
}

/// Chat message fallback for a failed remote reply
pub fn fallback_message(error: &BackendError, base_url: &str) -> String {
    match error {
        BackendError::Unreachable(_) | BackendError::InvalidResponse(_) => format!(
            "I'm currently unable to reach the health analysis server. \
             Please make sure the backend is running at {base_url} and try again."
        ),
        BackendError::Rejected { message, .. } => {
            format!("⚠️ {}", message.as_deref().unwrap_or(GENERIC_APOLOGY))
        }
    }
}

enum Dispatch {
    /// Route through the scripted interview for the mode at send time
    Routed(ChatMode),
    /// Straight to the backend
    Direct,
}

struct ReplyJob {
    content: String,
    dispatch: Dispatch,
    done: oneshot::Sender<()>,
}

/// Everything a reply worker needs. Does not hold the worker map, so
/// dropping the controller closes the queues.
struct ReplyContext<B, S> {
    store: SharedStore,
    backend: Arc<B>,
    scheduler: Arc<S>,
    typing: Arc<AtomicUsize>,
}

impl<B, S> Clone for ReplyContext<B, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            backend: self.backend.clone(),
            scheduler: self.scheduler.clone(),
            typing: self.typing.clone(),
        }
    }
}

/// Raises the typing indicator for its lifetime
struct TypingGuard(Arc<AtomicUsize>);

impl TypingGuard {
    fn raise(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct WorkspaceController<B, S = TokioScheduler> {
    ctx: ReplyContext<B, S>,
    workers: Arc<Mutex<HashMap<SessionId, mpsc::UnboundedSender<ReplyJob>>>>,
}

impl<B, S> Clone for WorkspaceController<B, S> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            workers: self.workers.clone(),
        }
    }
}

impl<B: ChatBackend + 'static, S: Scheduler> WorkspaceController<B, S> {
    pub fn new(store: SharedStore, backend: B, scheduler: S) -> Self {
        Self {
            ctx: ReplyContext {
                store,
                backend: Arc::new(backend),
                scheduler: Arc::new(scheduler),
                typing: Arc::new(AtomicUsize::new(0)),
            },
            workers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.ctx.store
    }

    pub fn backend(&self) -> &B {
        &self.ctx.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.ctx.scheduler
    }

    /// True while any reply is being produced
    pub fn is_typing(&self) -> bool {
        self.ctx.typing.load(Ordering::SeqCst) > 0
    }

    // ==================== Sessions ====================

    pub fn create_session(&self, title: impl Into<String>, mode: ChatMode) -> SessionId {
        let id = self.ctx.store.with(|s| s.add_session(ChatSession::new(title, mode)));
        tracing::info!(session_id = %id, mode = %mode, "Chat session created");
        id
    }

    pub fn select_session(&self, id: &str) -> Result<(), WorkspaceError> {
        if self.ctx.store.with(|s| s.set_active_chat(Some(id))) {
            Ok(())
        } else {
            Err(WorkspaceError::SessionNotFound(id.to_string()))
        }
    }

    /// Remove a session. Replies already queued for it finish unseen.
    pub fn delete_session(&self, id: &str) -> Result<(), WorkspaceError> {
        if !self.ctx.store.with(|s| s.delete_session(id)) {
            return Err(WorkspaceError::SessionNotFound(id.to_string()));
        }
        self.lock_workers().remove(id);
        tracing::info!(session_id = %id, "Chat session deleted");
        Ok(())
    }

    pub fn set_mode(&self, mode: ChatMode) {
        self.ctx.store.with(|s| s.set_chat_mode(mode));
    }

    /// Forget the captured symptom answers and restart the interview
    pub fn clear_interview(&self) {
        self.ctx.store.with(|s| s.symptom_intake_mut().clear());
    }

    // ==================== Sending ====================

    /// Send to the active session
    pub fn send_message(&self, message: OutgoingMessage) -> Result<PendingReply, WorkspaceError> {
        let id = self
            .ctx
            .store
            .with(|s| s.active_chat_id().map(String::from))
            .ok_or(WorkspaceError::NoActiveSession)?;
        self.send_to(&id, message)
    }

    pub fn send_to(&self, session_id: &str, message: OutgoingMessage) -> Result<PendingReply, WorkspaceError> {
        if message.text.trim().is_empty() && message.attachment.is_none() {
            return Err(WorkspaceError::EmptyMessage);
        }
        let content = compose_content(&message.text, message.attachment.as_ref());
        let mode = self.ctx.store.with(|s| s.chat_mode());
        self.post_user_message(session_id, content, Dispatch::Routed(mode))
    }

    /// Start a fresh exchange from a hand-off query (intake results or a
    /// deep link). The query goes straight to the backend.
    pub fn open_with_query(&self, mode_param: Option<&str>, query: &str) -> Result<PendingReply, WorkspaceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WorkspaceError::EmptyMessage);
        }
        if let Some(mode) = mode_param.and_then(ChatMode::from_param) {
            self.set_mode(mode);
        }
        let id = self
            .ctx
            .store
            .with(|s| s.active_chat_id().map(String::from))
            .ok_or(WorkspaceError::NoActiveSession)?;
        self.post_user_message(&id, query.to_string(), Dispatch::Direct)
    }

    fn post_user_message(
        &self,
        session_id: &str,
        content: String,
        dispatch: Dispatch,
    ) -> Result<PendingReply, WorkspaceError> {
        let appended = self
            .ctx
            .store
            .with(|s| s.add_message(session_id, ChatMessage::user(content.clone())));
        if !appended {
            return Err(WorkspaceError::SessionNotFound(session_id.to_string()));
        }

        let (done, rx) = oneshot::channel();
        self.enqueue(
            session_id,
            ReplyJob {
                content,
                dispatch,
                done,
            },
        );
        Ok(PendingReply { done: rx })
    }

    fn lock_workers(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, mpsc::UnboundedSender<ReplyJob>>> {
        self.workers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn enqueue(&self, session_id: &str, job: ReplyJob) {
        let mut workers = self.lock_workers();
        let job = match workers.get(session_id) {
            Some(tx) => match tx.send(job) {
                Ok(()) => return,
                Err(mpsc::error::SendError(job)) => job,
            },
            None => job,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive until the worker below starts
        let _ = tx.send(job);
        workers.insert(session_id.to_string(), tx);

        let ctx = self.ctx.clone();
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            tracing::debug!(session_id = %session_id, "Reply worker started");
            ctx.run_worker(&session_id, rx).await;
            tracing::debug!(session_id = %session_id, "Reply worker finished");
        });
    }
}

impl<B: ChatBackend, S: Scheduler> ReplyContext<B, S> {
    async fn run_worker(&self, session_id: &str, mut rx: mpsc::UnboundedReceiver<ReplyJob>) {
        while let Some(job) = rx.recv().await {
            {
                let _typing = TypingGuard::raise(&self.typing);
                match job.dispatch {
                    Dispatch::Routed(mode) => {
                        let step = self.store.with(|s| s.symptom_intake().chat_step);
                        self.reply(session_id, route(mode, step, &job.content), &job.content)
                            .await;
                    }
                    Dispatch::Direct => self.remote_reply(session_id, &job.content).await,
                }
            }
            let _ = job.done.send(());
        }
    }

    async fn reply(&self, session_id: &str, route: Route, content: &str) {
        match route {
            Route::Scripted {
                capture,
                prompt,
                next_step,
            } => {
                if let Some(capture) = capture {
                    self.store.with(|s| {
                        let intake = s.symptom_intake_mut();
                        match capture {
                            Capture::Symptom(symptom) => {
                                intake.symptoms.add(symptom);
                            }
                            Capture::Duration(duration) => intake.duration = Some(duration),
                            Capture::Severity(severity) => intake.severity = severity,
                        }
                    });
                }
                self.scheduler.sleep(SCRIPTED_REPLY_DELAY).await;
                self.store.with(|s| {
                    s.symptom_intake_mut().chat_step = next_step;
                    s.add_message(session_id, ChatMessage::ai(prompt))
                });
                tracing::debug!(session_id = %session_id, step = ?next_step, "Scripted interview advanced");
            }
            Route::Remote { finishes_intake } => {
                if finishes_intake {
                    self.store.with(|s| s.symptom_intake_mut().chat_step = ChatIntakeStep::Idle);
                }
                // Typed messages go out lowercased; only captures keep the casing
                self.remote_reply(session_id, &content.to_lowercase()).await;
            }
        }
    }

    async fn remote_reply(&self, session_id: &str, content: &str) {
        let (request, token) = self.store.with(|s| {
            (
                ChatRequest::new(content, s.language()),
                s.access_token().map(String::from),
            )
        });

        let message = match self.backend.chat(&request, token.as_deref()).await {
            Ok(reply) => {
                self.store.with(|s| {
                    s.update_insights(InsightsUpdate {
                        ai_confidence: Some(reply.confidence_percent()),
                        red_flags: Some(reply.risk_flags.clone()),
                        ..InsightsUpdate::default()
                    });
                    if reply.is_emergency() {
                        tracing::warn!(session_id = %session_id, flags = ?reply.risk_flags, "Emergency risk flagged");
                        s.trigger_emergency();
                    }
                });
                reply.response
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, kind = e.kind(), error = %e, "Chat reply failed");
                fallback_message(&e, self.backend.base_url())
            }
        };

        if !self.store.with(|s| s.add_message(session_id, ChatMessage::ai(message))) {
            tracing::debug!(session_id = %session_id, "Session gone, reply dropped");
        }
    }
}
