//! Effects produced by intake transitions

use crate::triage::Analysis;

/// Effects for the caller to carry out after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEffect {
    /// Results step entered; render this analysis
    ShowResults(Analysis),

    /// Open the chat workspace seeded with this query
    HandOff { query: String },
}

impl IntakeEffect {
    pub fn hand_off<S: AsRef<str>>(symptoms: &[S]) -> Self {
        let list = symptoms
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        IntakeEffect::HandOff {
            query: format!("I have these symptoms: {list}"),
        }
    }
}
