//! Pure intake transition function
//!
//! Given the same progress and event this always produces the same result.
//! Blocked forward navigation is reported as an error and leaves the
//! progress untouched; the UI treats it as a disabled control.

use super::state::{IntakeStep, Requirement, WizardProgress};
use super::{IntakeEffect, IntakeEvent};
use thiserror::Error;

/// Result of an intake transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WizardProgress,
    pub effects: Vec<IntakeEffect>,
}

impl TransitionResult {
    pub fn new(state: WizardProgress) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: IntakeEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons a transition is refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot continue from {step}: {missing} is required")]
    StepIncomplete {
        step: IntakeStep,
        missing: Requirement,
    },
    #[error("Already on the first step")]
    AtFirstStep,
    #[error("Already on the last step")]
    AtLastStep,
    #[error("'{event}' is not available on {step}")]
    WrongStep {
        event: &'static str,
        step: IntakeStep,
    },
    #[error("Unknown context question: {0}")]
    UnknownQuestion(String),
}

pub fn transition(
    state: &WizardProgress,
    event: IntakeEvent,
) -> Result<TransitionResult, TransitionError> {
    let step = state.step;
    let mut next = state.clone();

    match (step, event) {
        // ============================================================
        // Step 1: symptoms
        // ============================================================
        (IntakeStep::Symptoms, IntakeEvent::SearchChanged(query)) => {
            next.search_query = query;
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Symptoms, IntakeEvent::AddSymptom(symptom)) => {
            if next.symptoms.add(symptom) {
                next.search_query.clear();
            }
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Symptoms, IntakeEvent::RemoveSymptom(symptom)) => {
            next.symptoms.remove(&symptom);
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Symptoms, IntakeEvent::SelectRegion(region)) => {
            next.active_region = Some(region);
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Symptoms, IntakeEvent::ClearRegion) => {
            next.active_region = None;
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Step 2: level of care
        // ============================================================
        (IntakeStep::LevelOfCare, IntakeEvent::SelectLevelOfCare(level)) => {
            next.level_of_care = Some(level);
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Step 3: details
        // ============================================================
        (IntakeStep::Details, IntakeEvent::SetSeverity(value)) => {
            next.severity = super::Severity::new(value);
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Details, IntakeEvent::SelectDuration(duration)) => {
            next.duration = Some(duration);
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Details, IntakeEvent::AnswerContext { question, answer }) => {
            if !state.context_questions().iter().any(|q| *q == question) {
                return Err(TransitionError::UnknownQuestion(question));
            }
            next.context_answers.insert(question, answer);
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Navigation
        // ============================================================
        (_, IntakeEvent::Next) => {
            let Some(target) = step.next() else {
                return Err(TransitionError::AtLastStep);
            };
            if let Some(missing) = state.missing_requirement() {
                return Err(TransitionError::StepIncomplete { step, missing });
            }
            next.step = target;
            if target == IntakeStep::Results {
                let analysis = next.analysis();
                Ok(TransitionResult::new(next).with_effect(IntakeEffect::ShowResults(analysis)))
            } else {
                Ok(TransitionResult::new(next))
            }
        }

        (_, IntakeEvent::Back) => {
            let previous = step.previous().ok_or(TransitionError::AtFirstStep)?;
            next.step = previous;
            Ok(TransitionResult::new(next))
        }

        (IntakeStep::Results, IntakeEvent::Finish) => {
            let hand_off = IntakeEffect::hand_off(state.symptoms.as_slice());
            Ok(TransitionResult::new(WizardProgress::new()).with_effect(hand_off))
        }

        (_, IntakeEvent::Reset) => Ok(TransitionResult::new(WizardProgress::new())),

        (step, event) => Err(TransitionError::WrongStep {
            event: event.name(),
            step,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BodyRegion, DurationBucket, LevelOfCare};
    use crate::triage::TriageLevel;

    fn apply(state: &WizardProgress, events: impl IntoIterator<Item = IntakeEvent>) -> WizardProgress {
        events.into_iter().fold(state.clone(), |acc, event| {
            transition(&acc, event).unwrap().new_state
        })
    }

    fn at_details() -> WizardProgress {
        apply(
            &WizardProgress::new(),
            [
                IntakeEvent::AddSymptom("Headache".into()),
                IntakeEvent::Next,
                IntakeEvent::SelectLevelOfCare(LevelOfCare::PrimaryCare),
                IntakeEvent::Next,
            ],
        )
    }

    #[test]
    fn test_next_blocked_without_symptoms() {
        let result = transition(&WizardProgress::new(), IntakeEvent::Next);
        assert_eq!(
            result.unwrap_err(),
            TransitionError::StepIncomplete {
                step: IntakeStep::Symptoms,
                missing: Requirement::AtLeastOneSymptom,
            }
        );
    }

    #[test]
    fn test_add_symptom_clears_search() {
        let state = apply(
            &WizardProgress::new(),
            [
                IntakeEvent::SearchChanged("head".into()),
                IntakeEvent::AddSymptom("Headache".into()),
            ],
        );
        assert!(state.search_query.is_empty());
        assert!(state.symptoms.contains("Headache"));
    }

    #[test]
    fn test_level_of_care_required() {
        let state = apply(
            &WizardProgress::new(),
            [IntakeEvent::AddSymptom("Rash".into()), IntakeEvent::Next],
        );
        assert_eq!(state.step, IntakeStep::LevelOfCare);
        assert!(matches!(
            transition(&state, IntakeEvent::Next),
            Err(TransitionError::StepIncomplete {
                missing: Requirement::LevelOfCare,
                ..
            })
        ));
    }

    #[test]
    fn test_duration_required_but_severity_optional() {
        let state = at_details();
        assert!(transition(&state, IntakeEvent::Next).is_err());

        let state = apply(&state, [IntakeEvent::SelectDuration(DurationBucket::OneToThreeDays)]);
        let result = transition(&state, IntakeEvent::Next).unwrap();
        assert_eq!(result.new_state.step, IntakeStep::Results);
        assert_eq!(result.new_state.severity.value(), 5);
    }

    #[test]
    fn test_entering_results_emits_analysis() {
        let state = apply(&at_details(), [IntakeEvent::SelectDuration(DurationBucket::UnderADay)]);
        let result = transition(&state, IntakeEvent::Next).unwrap();
        match &result.effects[..] {
            [IntakeEffect::ShowResults(analysis)] => {
                assert_eq!(analysis.triage, TriageLevel::Primary);
                assert_eq!(analysis.confidence, 72);
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_back_keeps_later_selections() {
        let state = apply(
            &at_details(),
            [
                IntakeEvent::SetSeverity(8),
                IntakeEvent::SelectDuration(DurationBucket::OverAWeek),
                IntakeEvent::Back,
                IntakeEvent::Back,
            ],
        );
        assert_eq!(state.step, IntakeStep::Symptoms);
        assert_eq!(state.level_of_care, Some(LevelOfCare::PrimaryCare));
        assert_eq!(state.duration, Some(DurationBucket::OverAWeek));
        assert_eq!(state.severity.value(), 8);
    }

    #[test]
    fn test_back_on_first_step_rejected() {
        assert_eq!(
            transition(&WizardProgress::new(), IntakeEvent::Back).unwrap_err(),
            TransitionError::AtFirstStep
        );
    }

    #[test]
    fn test_context_answers() {
        let state = apply(
            &at_details(),
            [IntakeEvent::AnswerContext {
                question: "Throbbing pain?".into(),
                answer: true,
            }],
        );
        assert!(state.answer("Throbbing pain?"));
        assert!(!state.answer("Is it one-sided?"));

        let err = transition(
            &state,
            IntakeEvent::AnswerContext {
                question: "Coughing blood?".into(),
                answer: true,
            },
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::UnknownQuestion(_)));
    }

    #[test]
    fn test_events_outside_their_step_rejected() {
        let err = transition(
            &WizardProgress::new(),
            IntakeEvent::SelectDuration(DurationBucket::UnderADay),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::WrongStep {
                event: "select_duration",
                step: IntakeStep::Symptoms,
            }
        );
        assert!(transition(&at_details(), IntakeEvent::SelectRegion(BodyRegion::Head)).is_err());
    }

    #[test]
    fn test_finish_hands_off_and_resets() {
        let state = apply(
            &at_details(),
            [
                IntakeEvent::SelectDuration(DurationBucket::UnderADay),
                IntakeEvent::Next,
            ],
        );
        let result = transition(&state, IntakeEvent::Finish).unwrap();
        assert_eq!(result.new_state, WizardProgress::new());
        assert_eq!(
            result.effects,
            vec![IntakeEffect::HandOff {
                query: "I have these symptoms: Headache".into()
            }]
        );
    }

    #[test]
    fn test_reset_from_any_step() {
        let result = transition(&at_details(), IntakeEvent::Reset).unwrap();
        assert_eq!(result.new_state, WizardProgress::new());
        assert!(result.effects.is_empty());
    }
}
