//! Symptom intake wizard
//!
//! Four linear steps (symptoms, level of care, details, results) driven by
//! a pure transition function in the Elm Architecture style.

mod effect;
pub mod event;
pub mod questions;
pub mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::IntakeEffect;
pub use event::IntakeEvent;
pub use questions::context_questions;
pub use state::{IntakeStep, Requirement, Severity, SymptomSelection, WizardProgress};
pub use transition::{transition, TransitionError, TransitionResult};

use crate::catalog::DurationBucket;
use crate::store::{AppStore, SharedStore};

/// Owns wizard progress and applies events to it
#[derive(Debug, Default)]
pub struct IntakeWizard {
    progress: WizardProgress,
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on step 1 with the answers already captured in the store,
    /// so symptoms given to the chat interview show up as selected.
    pub fn from_store(store: &AppStore) -> Self {
        let shared = store.symptom_intake();
        let mut progress = WizardProgress::new();
        progress.symptoms = shared.symptoms.clone();
        progress.severity = shared.severity;
        progress.duration = shared.duration.as_deref().and_then(DurationBucket::from_label);
        Self { progress }
    }

    pub fn progress(&self) -> &WizardProgress {
        &self.progress
    }

    /// Apply an event, returning the effects to carry out.
    ///
    /// On error the progress is left as it was.
    pub fn apply(&mut self, event: IntakeEvent) -> Result<Vec<IntakeEffect>, TransitionError> {
        let name = event.name();
        let result = transition(&self.progress, event).inspect_err(|e| {
            tracing::debug!(event = name, step = self.progress.step.number(), error = %e, "Intake event refused");
        })?;
        if result.new_state.step != self.progress.step {
            tracing::debug!(
                from = self.progress.step.number(),
                to = result.new_state.step.number(),
                "Intake step changed"
            );
        }
        self.progress = result.new_state;
        Ok(result.effects)
    }

    /// Apply an event and write the symptom answers back to the store.
    ///
    /// Finishing hands off to the chat and keeps the stored answers.
    pub fn apply_shared(
        &mut self,
        store: &SharedStore,
        event: IntakeEvent,
    ) -> Result<Vec<IntakeEffect>, TransitionError> {
        let finishing = matches!(event, IntakeEvent::Finish);
        let effects = self.apply(event)?;
        if !finishing {
            store.with(|s| {
                let shared = s.symptom_intake_mut();
                shared.symptoms = self.progress.symptoms.clone();
                shared.severity = self.progress.severity;
                if let Some(duration) = self.progress.duration {
                    shared.duration = Some(duration.label().to_string());
                }
            });
        }
        Ok(effects)
    }
}
