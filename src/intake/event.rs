//! Events that drive the intake wizard

use crate::catalog::{BodyRegion, DurationBucket, LevelOfCare};

/// User actions on the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEvent {
    // Step 1: symptoms
    SearchChanged(String),
    AddSymptom(String),
    RemoveSymptom(String),
    SelectRegion(BodyRegion),
    ClearRegion,

    // Step 2: level of care
    SelectLevelOfCare(LevelOfCare),

    // Step 3: severity, duration, context
    SetSeverity(u8),
    SelectDuration(DurationBucket),
    AnswerContext { question: String, answer: bool },

    // Navigation
    Next,
    Back,
    /// Leave the results page for the chat workspace
    Finish,
    /// Explicit clear
    Reset,
}

impl IntakeEvent {
    /// Short name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            IntakeEvent::SearchChanged(_) => "search_changed",
            IntakeEvent::AddSymptom(_) => "add_symptom",
            IntakeEvent::RemoveSymptom(_) => "remove_symptom",
            IntakeEvent::SelectRegion(_) => "select_region",
            IntakeEvent::ClearRegion => "clear_region",
            IntakeEvent::SelectLevelOfCare(_) => "select_level_of_care",
            IntakeEvent::SetSeverity(_) => "set_severity",
            IntakeEvent::SelectDuration(_) => "select_duration",
            IntakeEvent::AnswerContext { .. } => "answer_context",
            IntakeEvent::Next => "next",
            IntakeEvent::Back => "back",
            IntakeEvent::Finish => "finish",
            IntakeEvent::Reset => "reset",
        }
    }
}
