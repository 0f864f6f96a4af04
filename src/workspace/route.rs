//! Pure routing of a sent message
//!
//! In symptom mode a short scripted interview runs before anything is sent
//! to the backend; its answers are captured as typed, not interpreted.

use crate::intake::Severity;
use crate::store::{ChatIntakeStep, ChatMode};
use regex::Regex;
use std::sync::LazyLock;

pub const GREETING_PROMPT: &str =
    "Hello! I'm here to help. Could you tell me what main symptom you are experiencing today?";
pub const DURATION_PROMPT: &str =
    "Got it. How long have you been experiencing this? (e.g., 2 days, 1 week)";
pub const SEVERITY_PROMPT: &str =
    "Understood. On a scale of 1-10, how severe is the pain or discomfort?";
pub const OTHER_SYMPTOMS_PROMPT: &str =
    "Noted. Are you experiencing any other symptoms like fever, nausea, or dizziness?";

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// An answer captured by the scripted interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    Symptom(String),
    Duration(String),
    Severity(Severity),
}

/// Where a message goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Reply locally with a canned prompt after the scripted delay
    Scripted {
        capture: Option<Capture>,
        prompt: &'static str,
        next_step: ChatIntakeStep,
    },
    /// Send to the backend
    Remote {
        /// The interview just finished and its step should return to idle
        finishes_intake: bool,
    },
}

pub fn route(mode: ChatMode, step: ChatIntakeStep, text: &str) -> Route {
    if mode != ChatMode::Symptom {
        return Route::Remote {
            finishes_intake: false,
        };
    }

    let text = text.trim();
    match step {
        ChatIntakeStep::Idle if is_greeting(text) => Route::Scripted {
            capture: None,
            prompt: GREETING_PROMPT,
            next_step: ChatIntakeStep::AwaitingSymptom,
        },
        ChatIntakeStep::Idle => Route::Remote {
            finishes_intake: false,
        },
        ChatIntakeStep::AwaitingSymptom => Route::Scripted {
            capture: Some(Capture::Symptom(text.to_string())),
            prompt: DURATION_PROMPT,
            next_step: ChatIntakeStep::AwaitingDuration,
        },
        ChatIntakeStep::AwaitingDuration => Route::Scripted {
            capture: Some(Capture::Duration(text.to_string())),
            prompt: SEVERITY_PROMPT,
            next_step: ChatIntakeStep::AwaitingSeverity,
        },
        ChatIntakeStep::AwaitingSeverity => Route::Scripted {
            capture: Some(Capture::Severity(parse_severity(text))),
            prompt: OTHER_SYMPTOMS_PROMPT,
            next_step: ChatIntakeStep::AwaitingOtherSymptoms,
        },
        ChatIntakeStep::AwaitingOtherSymptoms => Route::Remote {
            finishes_intake: true,
        },
    }
}

/// Any message containing "hi" or "hello" opens the interview, so
/// "this" and "chills" count too.
pub fn is_greeting(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("hi") || lower.contains("hello")
}

/// First integer in the text, clamped to the slider; 5 if there is none
pub fn parse_severity(text: &str) -> Severity {
    FIRST_NUMBER.find(text).map_or_else(Severity::default, |m| {
        // Digits only, so a failed parse means the number is too big
        let n = m.as_str().parse::<u64>().unwrap_or(u64::MAX);
        Severity::new(u8::try_from(n).unwrap_or(u8::MAX))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_starts_interview() {
        let route = route(ChatMode::Symptom, ChatIntakeStep::Idle, "Hello there");
        assert_eq!(
            route,
            Route::Scripted {
                capture: None,
                prompt: GREETING_PROMPT,
                next_step: ChatIntakeStep::AwaitingSymptom,
            }
        );
    }

    #[test]
    fn test_greeting_matches_substrings() {
        for text in ["This rash itches", "CHILLS at night", "hello", "Hi"] {
            assert!(
                matches!(
                    route(ChatMode::Symptom, ChatIntakeStep::Idle, text),
                    Route::Scripted { next_step: ChatIntakeStep::AwaitingSymptom, .. }
                ),
                "{text}"
            );
        }
        for text in ["hey", "sore throat", "fever since monday"] {
            assert_eq!(
                route(ChatMode::Symptom, ChatIntakeStep::Idle, text),
                Route::Remote { finishes_intake: false },
                "{text}"
            );
        }
    }

    #[test]
    fn test_interview_sequence() {
        assert_eq!(
            route(ChatMode::Symptom, ChatIntakeStep::AwaitingSymptom, " Headache "),
            Route::Scripted {
                capture: Some(Capture::Symptom("Headache".into())),
                prompt: DURATION_PROMPT,
                next_step: ChatIntakeStep::AwaitingDuration,
            }
        );
        assert_eq!(
            route(ChatMode::Symptom, ChatIntakeStep::AwaitingDuration, "2 days"),
            Route::Scripted {
                capture: Some(Capture::Duration("2 days".into())),
                prompt: SEVERITY_PROMPT,
                next_step: ChatIntakeStep::AwaitingSeverity,
            }
        );
        assert_eq!(
            route(ChatMode::Symptom, ChatIntakeStep::AwaitingSeverity, "about 7 out of 10"),
            Route::Scripted {
                capture: Some(Capture::Severity(Severity::new(7))),
                prompt: OTHER_SYMPTOMS_PROMPT,
                next_step: ChatIntakeStep::AwaitingOtherSymptoms,
            }
        );
        assert_eq!(
            route(ChatMode::Symptom, ChatIntakeStep::AwaitingOtherSymptoms, "nausea"),
            Route::Remote { finishes_intake: true }
        );
    }

    #[test]
    fn test_other_modes_always_remote() {
        for step in [ChatIntakeStep::Idle, ChatIntakeStep::AwaitingDuration] {
            assert_eq!(
                route(ChatMode::Lab, step, "hello"),
                Route::Remote { finishes_intake: false }
            );
        }
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("pretty bad").value(), 5);
        assert_eq!(parse_severity("8").value(), 8);
        assert_eq!(parse_severity("maybe 3 or 4").value(), 3);
        assert_eq!(parse_severity("99999999999999999999999").value(), 10);
        assert_eq!(parse_severity("250").value(), 10);
    }
}
