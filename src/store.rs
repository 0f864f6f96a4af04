//! Shared application store
//!
//! One explicit state struct with typed actions. The chat workspace, the
//! login flow and the terminal front-end all hold the same `SharedStore`.
//! Nothing here is persisted; state lives as long as the process.

use crate::intake::{Severity, SymptomSelection};
use crate::triage::{Risk, TriageLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Store handle shared between the controller and its reply tasks.
///
/// Never hold the guard across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Arc<Mutex<AppStore>>);

impl SharedStore {
    pub fn new(store: AppStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    pub fn lock(&self) -> MutexGuard<'_, AppStore> {
        // A panic while holding the lock leaves plain data behind; keep going
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Run a closure against the store
    pub fn with<T>(&self, f: impl FnOnce(&mut AppStore) -> T) -> T {
        f(&mut self.lock())
    }
}

// ============================================================================
// Chat Types
// ============================================================================

pub type SessionId = String;

/// Which workspace tool the chat is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    #[default]
    Symptom,
    Lab,
    Medication,
}

impl ChatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Symptom => "symptom",
            ChatMode::Lab => "lab",
            ChatMode::Medication => "medication",
        }
    }

    /// Parse a deep-link `mode` parameter. `image` uploads go through the
    /// symptom tool.
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "symptom" | "image" => Some(ChatMode::Symptom),
            "lab" => Some(ChatMode::Lab),
            "medication" => Some(ChatMode::Medication),
            _ => None,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ChatMode::Symptom => "Describe your symptoms here...",
            ChatMode::Lab => "Paste lab report values or describe your results...",
            ChatMode::Medication => "Enter medication name to check interactions...",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Ai,
}

/// A chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub mode: ChatMode,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(title: impl Into<String>, mode: ChatMode) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            messages: Vec::new(),
            mode,
            created_at: Utc::now(),
        }
    }
}

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your AI Health Companion. How can I help you today?";

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCause {
    pub name: String,
    pub probability: u8,
    pub risk: Risk,
    pub confidence: u8,
}

/// Latest analysis snapshot shown beside the chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub causes: Vec<InsightCause>,
    pub triage_level: TriageLevel,
    pub red_flags: Vec<String>,
    pub next_steps: Vec<String>,
    pub ai_confidence: u8,
}

impl Default for Insights {
    fn default() -> Self {
        let cause = |name: &str, probability, risk, confidence| InsightCause {
            name: name.to_string(),
            probability,
            risk,
            confidence,
        };
        Self {
            causes: vec![
                cause("Common Cold", 45, Risk::Low, 72),
                cause("Seasonal Allergies", 30, Risk::Low, 55),
                cause("Viral Infection", 25, Risk::Medium, 48),
            ],
            triage_level: TriageLevel::SelfCare,
            red_flags: Vec::new(),
            next_steps: vec![
                "Monitor symptoms".to_string(),
                "Stay hydrated".to_string(),
                "Rest well".to_string(),
            ],
            ai_confidence: 65,
        }
    }
}

/// Partial insights; `Some` fields overwrite, `None` fields are kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsUpdate {
    pub causes: Option<Vec<InsightCause>>,
    pub triage_level: Option<TriageLevel>,
    pub red_flags: Option<Vec<String>>,
    pub next_steps: Option<Vec<String>>,
    pub ai_confidence: Option<u8>,
}

impl Insights {
    /// Shallow merge
    pub fn merge(&mut self, update: InsightsUpdate) {
        if let Some(causes) = update.causes {
            self.causes = causes;
        }
        if let Some(level) = update.triage_level {
            self.triage_level = level;
        }
        if let Some(flags) = update.red_flags {
            self.red_flags = flags;
        }
        if let Some(steps) = update.next_steps {
            self.next_steps = steps;
        }
        if let Some(confidence) = update.ai_confidence {
            self.ai_confidence = confidence;
        }
    }
}

// ============================================================================
// Symptom Intake
// ============================================================================

/// Position of the scripted symptom interview inside the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntakeStep {
    #[default]
    Idle,
    AwaitingSymptom,
    AwaitingDuration,
    AwaitingSeverity,
    AwaitingOtherSymptoms,
}

/// Symptom answers shared by the chat interview and the intake wizard.
///
/// The chat captures free text; the wizard reads it as its starting point
/// and writes its own choices back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomIntake {
    pub chat_step: ChatIntakeStep,
    pub symptoms: SymptomSelection,
    pub duration: Option<String>,
    pub severity: Severity,
}

impl SymptomIntake {
    /// Drop every answer and restart the chat interview
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

// ============================================================================
// App Store
// ============================================================================

#[derive(Debug, Clone)]
pub struct AppStore {
    is_authenticated: bool,
    access_token: Option<String>,
    user_profile: Option<UserProfile>,
    disclaimer_accepted: bool,
    language: String,
    sessions: Vec<ChatSession>,
    active_chat_id: Option<SessionId>,
    chat_mode: ChatMode,
    insights: Insights,
    emergency_active: bool,
    symptom_intake: SymptomIntake,
}

impl Default for AppStore {
    fn default() -> Self {
        Self {
            is_authenticated: false,
            access_token: None,
            user_profile: None,
            disclaimer_accepted: false,
            language: crate::config::DEFAULT_LANGUAGE.to_string(),
            sessions: Vec::new(),
            active_chat_id: None,
            chat_mode: ChatMode::default(),
            insights: Insights::default(),
            emergency_active: false,
            symptom_intake: SymptomIntake::default(),
        }
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a single greeting session, active
    pub fn with_welcome_session() -> Self {
        let mut store = Self::new();
        let mut session = ChatSession::new("Headache & Fever", ChatMode::Symptom);
        session.messages.push(ChatMessage::ai(WELCOME_MESSAGE));
        store.add_session(session);
        store
    }

    // ==================== Auth ====================

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn set_authenticated(&mut self, value: bool) {
        self.is_authenticated = value;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.user_profile.as_ref()
    }

    pub fn set_user_profile(&mut self, profile: Option<UserProfile>) {
        self.user_profile = profile;
    }

    pub fn disclaimer_accepted(&self) -> bool {
        self.disclaimer_accepted
    }

    pub fn accept_disclaimer(&mut self) {
        self.disclaimer_accepted = true;
    }

    // ==================== Language ====================

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    // ==================== Sessions ====================

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_chat_id().and_then(|id| self.session(id))
    }

    /// Newest sessions first; the new session becomes active
    pub fn add_session(&mut self, session: ChatSession) -> SessionId {
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_chat_id = Some(id.clone());
        id
    }

    /// Select a session. Unknown ids are refused so the active id never
    /// dangles.
    pub fn set_active_chat(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.session(id).is_none() => false,
            _ => {
                self.active_chat_id = id.map(String::from);
                true
            }
        }
    }

    /// Append a message. Returns false if the session no longer exists.
    pub fn add_message(&mut self, session_id: &str, message: ChatMessage) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.messages.push(message);
                true
            }
            None => false,
        }
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.active_chat_id.as_deref() == Some(id) {
            self.active_chat_id = None;
        }
        self.sessions.len() != before
    }

    pub fn chat_mode(&self) -> ChatMode {
        self.chat_mode
    }

    pub fn set_chat_mode(&mut self, mode: ChatMode) {
        self.chat_mode = mode;
    }

    // ==================== Insights ====================

    pub fn insights(&self) -> &Insights {
        &self.insights
    }

    pub fn update_insights(&mut self, update: InsightsUpdate) {
        self.insights.merge(update);
    }

    // ==================== Emergency ====================

    pub fn emergency_active(&self) -> bool {
        self.emergency_active
    }

    pub fn trigger_emergency(&mut self) {
        self.emergency_active = true;
    }

    pub fn dismiss_emergency(&mut self) {
        self.emergency_active = false;
    }

    // ==================== Symptom Intake ====================

    pub fn symptom_intake(&self) -> &SymptomIntake {
        &self.symptom_intake
    }

    pub fn symptom_intake_mut(&mut self) -> &mut SymptomIntake {
        &mut self.symptom_intake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_session_is_active() {
        let store = AppStore::with_welcome_session();
        let session = store.active_session().unwrap();
        assert_eq!(session.title, "Headache & Fever");
        assert_eq!(session.messages[0].content, WELCOME_MESSAGE);
        assert_eq!(session.messages[0].role, Role::Ai);
    }

    #[test]
    fn test_new_session_inserted_first_and_active() {
        let mut store = AppStore::with_welcome_session();
        let id = store.add_session(ChatSession::new("New chat", ChatMode::Lab));
        assert_eq!(store.sessions()[0].id, id);
        assert_eq!(store.active_chat_id(), Some(id.as_str()));
        assert_eq!(store.sessions().len(), 2);
    }

    #[test]
    fn test_deleting_active_session_clears_active_id() {
        let mut store = AppStore::with_welcome_session();
        let id = store.active_chat_id().unwrap().to_string();
        assert!(store.delete_session(&id));
        assert_eq!(store.active_chat_id(), None);
        assert!(!store.add_message(&id, ChatMessage::user("hello")));
    }

    #[test]
    fn test_deleting_other_session_keeps_active_id() {
        let mut store = AppStore::with_welcome_session();
        let first = store.active_chat_id().unwrap().to_string();
        let second = store.add_session(ChatSession::new("Second", ChatMode::Symptom));
        assert!(store.delete_session(&first));
        assert_eq!(store.active_chat_id(), Some(second.as_str()));
    }

    #[test]
    fn test_cannot_activate_unknown_session() {
        let mut store = AppStore::new();
        assert!(!store.set_active_chat(Some("missing")));
        assert_eq!(store.active_chat_id(), None);
        assert!(store.set_active_chat(None));
    }

    #[test]
    fn test_messages_keep_append_order() {
        let mut store = AppStore::new();
        let id = store.add_session(ChatSession::new("t", ChatMode::Symptom));
        for n in 0..5 {
            store.add_message(&id, ChatMessage::user(n.to_string()));
        }
        let contents: Vec<_> = store.session(&id).unwrap().messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_insights_merge_only_overwrites_given_fields() {
        let mut store = AppStore::new();
        store.update_insights(InsightsUpdate {
            ai_confidence: Some(91),
            red_flags: Some(vec!["fever".into()]),
            ..InsightsUpdate::default()
        });
        let insights = store.insights();
        assert_eq!(insights.ai_confidence, 91);
        assert_eq!(insights.red_flags, vec!["fever".to_string()]);
        assert_eq!(insights.causes.len(), 3);
        assert_eq!(insights.triage_level, TriageLevel::SelfCare);
    }

    #[test]
    fn test_emergency_toggle() {
        let mut store = AppStore::new();
        store.trigger_emergency();
        assert!(store.emergency_active());
        store.dismiss_emergency();
        assert!(!store.emergency_active());
    }

    #[test]
    fn test_chat_mode_params() {
        assert_eq!(ChatMode::from_param("image"), Some(ChatMode::Symptom));
        assert_eq!(ChatMode::from_param("lab"), Some(ChatMode::Lab));
        assert_eq!(ChatMode::from_param("x-ray"), None);
    }

    #[test]
    fn test_shared_store_clones_share_state() {
        let shared = SharedStore::new(AppStore::new());
        let other = shared.clone();
        other.with(|s| s.set_language("hi"));
        assert_eq!(shared.lock().language(), "hi");
    }
}
