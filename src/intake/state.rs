//! Intake wizard state types

use super::questions::context_questions;
use crate::catalog::{self, BodyRegion, DurationBucket, LevelOfCare};
use crate::triage::{self, Analysis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Symptom Selection
// ============================================================================

/// Ordered set of symptom strings. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSelection(Vec<String>);

impl SymptomSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symptom. Returns false if it was blank or already present.
    pub fn add(&mut self, symptom: impl Into<String>) -> bool {
        let symptom = symptom.into();
        let symptom = symptom.trim();
        if symptom.is_empty() || self.contains(symptom) {
            return false;
        }
        self.0.push(symptom.to_string());
        true
    }

    /// Remove a symptom. Returns false if it was not selected.
    pub fn remove(&mut self, symptom: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s != symptom);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.0.iter().any(|s| s == symptom)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Lowercased symptoms joined with spaces, the text keyword rules match on
    pub fn joined_lowercase(&self) -> String {
        crate::triage::joined_lowercase(&self.0)
    }
}

impl<S: Into<String>> FromIterator<S> for SymptomSelection {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut selection = Self::new();
        for symptom in iter {
            selection.add(symptom);
        }
        selection
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Severity on a 0..=10 slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MAX: u8 = 10;

    /// Clamp into range
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

// ============================================================================
// Wizard Progress
// ============================================================================

/// The four wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    #[default]
    Symptoms,
    LevelOfCare,
    Details,
    Results,
}

impl IntakeStep {
    /// 1-based step number shown as "Step n of 4"
    pub fn number(self) -> u8 {
        match self {
            IntakeStep::Symptoms => 1,
            IntakeStep::LevelOfCare => 2,
            IntakeStep::Details => 3,
            IntakeStep::Results => 4,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            IntakeStep::Symptoms => Some(IntakeStep::LevelOfCare),
            IntakeStep::LevelOfCare => Some(IntakeStep::Details),
            IntakeStep::Details => Some(IntakeStep::Results),
            IntakeStep::Results => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            IntakeStep::Symptoms => None,
            IntakeStep::LevelOfCare => Some(IntakeStep::Symptoms),
            IntakeStep::Details => Some(IntakeStep::LevelOfCare),
            IntakeStep::Results => Some(IntakeStep::Details),
        }
    }
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} of 4", self.number())
    }
}

/// The field a step needs before the wizard can move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    AtLeastOneSymptom,
    LevelOfCare,
    Duration,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Requirement::AtLeastOneSymptom => "at least one symptom",
            Requirement::LevelOfCare => "a level of care",
            Requirement::Duration => "a duration",
        })
    }
}

/// Everything the wizard has collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardProgress {
    pub step: IntakeStep,
    pub symptoms: SymptomSelection,
    pub level_of_care: Option<LevelOfCare>,
    pub severity: Severity,
    pub duration: Option<DurationBucket>,
    /// Keyed by question text; unanswered questions are absent (unchecked)
    pub context_answers: BTreeMap<String, bool>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub active_region: Option<BodyRegion>,
}

impl WizardProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// What is still missing before `Next` is accepted on the current step
    pub fn missing_requirement(&self) -> Option<Requirement> {
        match self.step {
            IntakeStep::Symptoms if self.symptoms.is_empty() => {
                Some(Requirement::AtLeastOneSymptom)
            }
            IntakeStep::LevelOfCare if self.level_of_care.is_none() => {
                Some(Requirement::LevelOfCare)
            }
            IntakeStep::Details if self.duration.is_none() => Some(Requirement::Duration),
            _ => None,
        }
    }

    /// Whether the forward control is enabled
    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.missing_requirement().is_none()
    }

    /// Follow-up questions for the current symptom set
    pub fn context_questions(&self) -> Vec<&'static str> {
        context_questions(self.symptoms.as_slice())
    }

    /// Whether a context question has been ticked
    pub fn answer(&self, question: &str) -> bool {
        self.context_answers.get(question).copied().unwrap_or(false)
    }

    /// Search suggestions for the current query
    pub fn search_results(&self) -> Vec<&'static str> {
        catalog::search(
            &self.search_query,
            self.symptoms.iter(),
            catalog::SEARCH_RESULT_LIMIT,
        )
    }

    /// Symptoms offered by the selected body region, minus selected ones
    pub fn region_symptoms(&self) -> Vec<&'static str> {
        self.active_region
            .map(|region| {
                region
                    .symptoms()
                    .iter()
                    .copied()
                    .filter(|s| !self.symptoms.contains(s))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Analysis over the selected symptoms only
    pub fn analysis(&self) -> Analysis {
        triage::analyze(self.symptoms.as_slice())
    }

    /// Progress through the wizard as a percentage
    pub fn progress_percent(&self) -> u8 {
        self.step.number() * 25
    }
}
