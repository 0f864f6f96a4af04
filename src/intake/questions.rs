//! Context follow-up questions derived from the selected symptoms

use crate::triage::joined_lowercase;

/// Questions contributed when `keyword` appears in the symptom text
#[derive(Debug)]
pub struct QuestionRule {
    pub keyword: &'static str,
    pub questions: &'static [&'static str],
}

/// Every matching rule contributes, in table order
pub const CONTEXT_RULES: &[QuestionRule] = &[
    QuestionRule {
        keyword: "headache",
        questions: &["Is it one-sided?", "Sensitivity to light?", "Throbbing pain?"],
    },
    QuestionRule {
        keyword: "fever",
        questions: &[
            "Body temperature above 39°C?",
            "Fever present for more than 3 days?",
        ],
    },
    QuestionRule {
        keyword: "cough",
        questions: &[
            "Is the cough dry?",
            "Producing mucus/phlegm?",
            "Coughing blood?",
        ],
    },
    QuestionRule {
        keyword: "chest pain",
        questions: &[
            "Does it radiate to the arm?",
            "Does it worsen with breathing?",
        ],
    },
    QuestionRule {
        keyword: "stomach pain",
        questions: &["Pain after eating?", "Pain in upper or lower abdomen?"],
    },
];

/// Asked when no rule matches
pub const GENERIC_QUESTIONS: &[&str] = &[
    "Is this your first time experiencing these symptoms?",
    "Any recent travel?",
    "Any known allergies?",
];

pub fn context_questions<S: AsRef<str>>(symptoms: &[S]) -> Vec<&'static str> {
    let haystack = joined_lowercase(symptoms);
    let questions: Vec<&'static str> = CONTEXT_RULES
        .iter()
        .filter(|rule| haystack.contains(rule.keyword))
        .flat_map(|rule| rule.questions.iter().copied())
        .collect();

    if questions.is_empty() {
        GENERIC_QUESTIONS.to_vec()
    } else {
        questions
    }
}
