//! Chikitsak health companion client
//!
//! Guided symptom intake with rule-based triage, and a chat workspace that
//! talks to the Chikitsak health backend.

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod attachment;
pub mod auth;
pub mod backend;
pub mod calculators;
pub mod catalog;
pub mod config;
pub mod intake;
pub mod records;
pub mod speech;
pub mod store;
pub mod triage;
pub mod workspace;

pub use backend::{BackendError, ChatBackend, HttpBackend, LoggingBackend};
pub use config::{ClientConfig, Preferences};
pub use store::{AppStore, SharedStore};
pub use workspace::{OutgoingMessage, WorkspaceController, WorkspaceError};
