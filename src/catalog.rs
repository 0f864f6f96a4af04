//! Fixed symptom catalog and intake option lists
//!
//! The body-region map stands in for the selectable body diagram; search
//! runs over the de-duplicated union of every region's symptoms.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Maximum number of search suggestions returned at once
pub const SEARCH_RESULT_LIMIT: usize = 8;

/// Selectable regions of the body diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Head,
    Chest,
    Abdomen,
    Arms,
    Legs,
    Throat,
    Back,
    Skin,
    General,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 9] = [
        BodyRegion::Head,
        BodyRegion::Chest,
        BodyRegion::Abdomen,
        BodyRegion::Arms,
        BodyRegion::Legs,
        BodyRegion::Throat,
        BodyRegion::Back,
        BodyRegion::Skin,
        BodyRegion::General,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BodyRegion::Head => "Head",
            BodyRegion::Chest => "Chest",
            BodyRegion::Abdomen => "Abdomen",
            BodyRegion::Arms => "Arms & Hands",
            BodyRegion::Legs => "Legs & Feet",
            BodyRegion::Throat => "Throat & Neck",
            BodyRegion::Back => "Back",
            BodyRegion::Skin => "Skin",
            BodyRegion::General => "General",
        }
    }

    pub fn symptoms(self) -> &'static [&'static str] {
        match self {
            BodyRegion::Head => &[
                "Headache",
                "Dizziness",
                "Hair loss",
                "Forehead bumps",
                "Vision problems",
                "Nausea",
                "Ear pain",
                "Sinus pain",
                "Facial muscle pain",
                "Scalp tenderness",
            ],
            BodyRegion::Chest => &[
                "Chest pain",
                "Shortness of breath",
                "Heart palpitations",
                "Chest tightness",
                "Wheezing",
                "Cough",
                "Rib pain",
                "Heartburn",
            ],
            BodyRegion::Abdomen => &[
                "Stomach pain",
                "Bloating",
                "Nausea",
                "Vomiting",
                "Diarrhea",
                "Constipation",
                "Loss of appetite",
                "Acid reflux",
                "Cramps",
            ],
            BodyRegion::Arms => &[
                "Wrist pain",
                "Pain when moving wrist",
                "Pain in hand or fingers",
                "Pain in one finger",
                "Nail pain",
                "Elbow pain",
                "Shoulder pain",
                "Numbness",
                "Tingling",
                "Swelling",
            ],
            BodyRegion::Legs => &[
                "Knee pain",
                "Ankle pain",
                "Foot pain",
                "Leg cramp",
                "Swollen legs",
                "Hip pain",
                "Thigh pain",
                "Toe pain",
                "Numbness in feet",
            ],
            BodyRegion::Throat => &[
                "Sore throat",
                "Difficulty swallowing",
                "Neck pain",
                "Swollen lymph nodes",
                "Hoarse voice",
                "Neck stiffness",
                "Lump in throat",
            ],
            BodyRegion::Back => &[
                "Lower back pain",
                "Upper back pain",
                "Spine pain",
                "Muscle spasm",
                "Stiffness",
                "Sciatica",
                "Pain when bending",
            ],
            BodyRegion::Skin => &[
                "Rash",
                "Itching",
                "Dry skin",
                "Skin redness",
                "Hives",
                "Acne",
                "Skin discoloration",
                "Bruising",
                "Wound not healing",
            ],
            BodyRegion::General => &[
                "Fever",
                "Fatigue",
                "Weight loss",
                "Weight gain",
                "Night sweats",
                "Chills",
                "Weakness",
                "Insomnia",
                "Anxiety",
                "Depression",
            ],
        }
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every catalog symptom once, in region order
pub fn all_symptoms() -> &'static [&'static str] {
    static UNIQUE: OnceLock<Vec<&'static str>> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut seen = HashSet::new();
        BodyRegion::ALL
            .iter()
            .flat_map(|region| region.symptoms().iter().copied())
            .filter(|symptom| seen.insert(*symptom))
            .collect()
    })
}

/// Case-insensitive substring search over the catalog.
///
/// Already-selected symptoms are skipped and at most `limit` results are
/// returned. A blank query yields nothing.
pub fn search<'a, I>(query: &str, selected: I, limit: usize) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    // Blank queries list nothing; otherwise the query is matched as typed
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let selected: HashSet<&str> = selected.into_iter().collect();

    all_symptoms()
        .iter()
        .copied()
        .filter(|symptom| symptom.to_lowercase().contains(&needle))
        .filter(|symptom| !selected.contains(symptom))
        .take(limit)
        .collect()
}

/// Level of care the user would otherwise seek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelOfCare {
    DoingNothing,
    SelfCare,
    PrimaryCare,
    SpecialistCare,
    AlliedHealthCare,
    UrgentCare,
    EmergencyRoom,
    Ambulance,
    NotSure,
}

impl LevelOfCare {
    pub const ALL: [LevelOfCare; 9] = [
        LevelOfCare::DoingNothing,
        LevelOfCare::SelfCare,
        LevelOfCare::PrimaryCare,
        LevelOfCare::SpecialistCare,
        LevelOfCare::AlliedHealthCare,
        LevelOfCare::UrgentCare,
        LevelOfCare::EmergencyRoom,
        LevelOfCare::Ambulance,
        LevelOfCare::NotSure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LevelOfCare::DoingNothing => "Doing nothing",
            LevelOfCare::SelfCare => "Self-care",
            LevelOfCare::PrimaryCare => "Primary care",
            LevelOfCare::SpecialistCare => "Specialist care",
            LevelOfCare::AlliedHealthCare => "Allied health care (dietitian/therapist)",
            LevelOfCare::UrgentCare => "Urgent care",
            LevelOfCare::EmergencyRoom => "Going to Emergency Room",
            LevelOfCare::Ambulance => "Calling an ambulance",
            LevelOfCare::NotSure => "Not sure",
        }
    }
}

impl fmt::Display for LevelOfCare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How long the symptoms have been present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    UnderADay,
    OneToThreeDays,
    ThreeToSevenDays,
    OverAWeek,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 4] = [
        DurationBucket::UnderADay,
        DurationBucket::OneToThreeDays,
        DurationBucket::ThreeToSevenDays,
        DurationBucket::OverAWeek,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::UnderADay => "< 24 hours",
            DurationBucket::OneToThreeDays => "1–3 days",
            DurationBucket::ThreeToSevenDays => "3–7 days",
            DurationBucket::OverAWeek => "> 1 week",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label.trim())
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
