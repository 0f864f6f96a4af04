//! Property-based tests for the intake wizard
//!
//! Random event sequences are driven through `transition` and the
//! wizard invariants are checked after every step.

use super::*;
use crate::catalog::{all_symptoms, BodyRegion, DurationBucket, LevelOfCare};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_symptom() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(all_symptoms().to_vec()).prop_map(String::from),
        "[a-z ]{0,12}",
    ]
}

fn arb_event() -> impl Strategy<Value = IntakeEvent> {
    prop_oneof![
        arb_symptom().prop_map(IntakeEvent::AddSymptom),
        arb_symptom().prop_map(IntakeEvent::RemoveSymptom),
        "[a-z]{0,6}".prop_map(IntakeEvent::SearchChanged),
        proptest::sample::select(BodyRegion::ALL.to_vec()).prop_map(IntakeEvent::SelectRegion),
        proptest::sample::select(LevelOfCare::ALL.to_vec()).prop_map(IntakeEvent::SelectLevelOfCare),
        any::<u8>().prop_map(IntakeEvent::SetSeverity),
        proptest::sample::select(DurationBucket::ALL.to_vec()).prop_map(IntakeEvent::SelectDuration),
        Just(IntakeEvent::Next),
        Just(IntakeEvent::Next),
        Just(IntakeEvent::Back),
        Just(IntakeEvent::Finish),
    ]
}

fn check_invariants(progress: &WizardProgress) -> Result<(), TestCaseError> {
    let unique: HashSet<&str> = progress.symptoms.iter().collect();
    prop_assert_eq!(unique.len(), progress.symptoms.len(), "duplicate symptoms");
    prop_assert!(progress.severity.value() <= Severity::MAX);
    if progress.step > IntakeStep::Symptoms {
        prop_assert!(!progress.symptoms.is_empty());
    }
    if progress.step > IntakeStep::LevelOfCare {
        prop_assert!(progress.level_of_care.is_some());
    }
    if progress.step > IntakeStep::Details {
        prop_assert!(progress.duration.is_some());
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn invariants_hold_over_any_event_sequence(
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let mut progress = WizardProgress::new();
        for event in events {
            let before = progress.step.number();
            if let Ok(result) = transition(&progress, event) {
                progress = result.new_state;
            }
            let after = progress.step.number();
            // One step at a time, or a reset to the start
            prop_assert!(after <= before + 1, "skipped from {before} to {after}");
            check_invariants(&progress)?;
        }
    }

    #[test]
    fn adding_twice_is_idempotent(symptom in arb_symptom()) {
        let once = transition(&WizardProgress::new(), IntakeEvent::AddSymptom(symptom.clone()))
            .unwrap()
            .new_state;
        let twice = transition(&once, IntakeEvent::AddSymptom(symptom)).unwrap().new_state;
        prop_assert_eq!(once.symptoms.len(), twice.symptoms.len());
    }
}
