//! Property-based tests for the triage rule table

use super::*;
use crate::catalog::all_symptoms;
use proptest::prelude::*;

fn arb_catalog_symptom() -> impl Strategy<Value = String> {
    proptest::sample::select(all_symptoms().to_vec()).prop_map(String::from)
}

/// Symptoms that trigger neither the cardio nor the viral rule
fn arb_benign_symptom() -> impl Strategy<Value = String> {
    arb_catalog_symptom().prop_filter("must not match a rule", |s| {
        let lower = s.to_lowercase();
        !TRIAGE_RULES.iter().any(|rule| rule.matches(&lower))
    })
}

proptest! {
    #[test]
    fn urgent_whenever_cardio_keyword_present(
        mut symptoms in proptest::collection::vec(arb_catalog_symptom(), 0..6),
        cardio in prop_oneof![Just("Chest pain"), Just("Shortness of breath")],
        position in 0usize..6,
    ) {
        let at = position.min(symptoms.len());
        symptoms.insert(at, cardio.to_string());
        prop_assert_eq!(analyze(&symptoms).triage, TriageLevel::Urgent);
    }

    #[test]
    fn primary_for_viral_keywords_without_cardio(
        mut symptoms in proptest::collection::vec(arb_benign_symptom(), 0..6),
        viral in prop_oneof![Just("Headache"), Just("Fever")],
    ) {
        symptoms.push(viral.to_string());
        prop_assert_eq!(analyze(&symptoms).triage, TriageLevel::Primary);
        prop_assert_eq!(analyze(&symptoms).confidence, 72);
    }

    #[test]
    fn self_care_for_everything_else(
        symptoms in proptest::collection::vec(arb_benign_symptom(), 1..6),
    ) {
        prop_assert_eq!(analyze(&symptoms).triage, TriageLevel::SelfCare);
    }

    #[test]
    fn analysis_is_deterministic(
        symptoms in proptest::collection::vec(arb_catalog_symptom(), 0..8),
    ) {
        prop_assert_eq!(analyze(&symptoms), analyze(&symptoms));
    }
}
