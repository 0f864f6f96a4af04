//! Keyword triage rules
//!
//! `analyze` is a fixed lookup, not a model: rules are evaluated top-down
//! over the joined, lowercased symptom text and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod proptests;

/// Recommended care pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriageLevel {
    #[default]
    SelfCare,
    Primary,
    Urgent,
    Emergency,
}

impl TriageLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TriageLevel::SelfCare => "self-care",
            TriageLevel::Primary => "primary",
            TriageLevel::Urgent => "urgent",
            TriageLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk attached to a candidate condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn label(self) -> &'static str {
        match self {
            Risk::Low => "Low",
            Risk::Medium => "Medium",
            Risk::High => "High",
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A candidate condition with its estimated probability (percent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEstimate {
    pub name: &'static str,
    pub probability: u8,
    pub risk: Risk,
}

const fn condition(name: &'static str, probability: u8, risk: Risk) -> ConditionEstimate {
    ConditionEstimate {
        name,
        probability,
        risk,
    }
}

/// Fixed outcome of a triage rule
#[derive(Debug)]
pub struct TriageProfile {
    pub conditions: &'static [ConditionEstimate],
    pub triage: TriageLevel,
    pub confidence: u8,
}

/// A keyword rule: any keyword present selects the profile
#[derive(Debug)]
pub struct TriageRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub profile: TriageProfile,
}

impl TriageRule {
    pub fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

/// Ordered rule table, most severe first
pub const TRIAGE_RULES: &[TriageRule] = &[
    TriageRule {
        name: "cardio",
        keywords: &["chest pain", "shortness of breath"],
        profile: TriageProfile {
            conditions: &[
                condition("Acute Coronary Syndrome", 35, Risk::High),
                condition("Costochondritis", 25, Risk::Medium),
                condition("Anxiety/Panic Attack", 20, Risk::Low),
                condition("GERD", 20, Risk::Low),
            ],
            triage: TriageLevel::Urgent,
            confidence: 62,
        },
    },
    TriageRule {
        name: "viral",
        keywords: &["headache", "fever"],
        profile: TriageProfile {
            conditions: &[
                condition("Viral Infection", 40, Risk::Medium),
                condition("Tension Headache", 30, Risk::Low),
                condition("Sinusitis", 20, Risk::Low),
                condition("Migraine", 10, Risk::Low),
            ],
            triage: TriageLevel::Primary,
            confidence: 72,
        },
    },
];

/// Profile used when no rule matches
pub const DEFAULT_PROFILE: TriageProfile = TriageProfile {
    conditions: &[
        condition("Common Cold", 35, Risk::Low),
        condition("Seasonal Allergies", 25, Risk::Low),
        condition("Viral Infection", 25, Risk::Medium),
        condition("Stress Response", 15, Risk::Low),
    ],
    triage: TriageLevel::SelfCare,
    confidence: 58,
};

/// Result of analyzing a symptom set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub conditions: Vec<ConditionEstimate>,
    pub triage: TriageLevel,
    pub confidence: u8,
}

impl From<&TriageProfile> for Analysis {
    fn from(profile: &TriageProfile) -> Self {
        Self {
            conditions: profile.conditions.to_vec(),
            triage: profile.triage,
            confidence: profile.confidence,
        }
    }
}

/// Pick the first rule matching the symptom set, if any
pub fn matching_rule<S: AsRef<str>>(symptoms: &[S]) -> Option<&'static TriageRule> {
    let haystack = joined_lowercase(symptoms);
    TRIAGE_RULES.iter().find(|rule| rule.matches(&haystack))
}

/// Analyze a symptom set. Deterministic for a given set.
pub fn analyze<S: AsRef<str>>(symptoms: &[S]) -> Analysis {
    match matching_rule(symptoms) {
        Some(rule) => Analysis::from(&rule.profile),
        None => Analysis::from(&DEFAULT_PROFILE),
    }
}

pub(crate) fn joined_lowercase<S: AsRef<str>>(symptoms: &[S]) -> String {
    symptoms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
