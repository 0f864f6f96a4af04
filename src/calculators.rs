//! Everyday health calculators
//!
//! Plain formulas with fixed thresholds. Every calculator returns `None`
//! for missing (zero) or nonsensical inputs instead of a result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Height assumed by the calorie estimate, in centimetres
pub const REFERENCE_HEIGHT_CM: f64 = 170.0;

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

// ==================== BMI ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}", self.category.label(), self.value)
    }
}

pub fn bmi(height_cm: f64, weight_kg: f64) -> Option<Bmi> {
    let height_m = positive(height_cm)? / 100.0;
    let value = positive(weight_kg)? / (height_m * height_m);
    let category = if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 25.0 {
        BmiCategory::Normal
    } else if value < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };
    Some(Bmi { value, category })
}

// ==================== Calories ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        }
    }

    /// Unknown names fall back to moderate
    pub fn from_param(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }
}

/// Daily calorie need in kcal, Harris-Benedict BMR times activity,
/// rounded to a whole number
pub fn daily_calories(age_years: u32, weight_kg: f64, sex: Sex, activity: ActivityLevel) -> Option<f64> {
    if age_years == 0 {
        return None;
    }
    let weight = positive(weight_kg)?;
    let age = f64::from(age_years);
    let bmr = match sex {
        Sex::Male => 88.362 + 13.397 * weight + 4.799 * REFERENCE_HEIGHT_CM - 5.677 * age,
        Sex::Female => 447.593 + 9.247 * weight + 3.098 * REFERENCE_HEIGHT_CM - 4.330 * age,
    };
    Some((bmr * activity.multiplier()).round())
}

// ==================== Heart risk ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartRisk {
    /// Points out of 80
    pub percent: u8,
    pub level: RiskLevel,
}

impl fmt::Display for HeartRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Risk: {}%", self.level.label(), self.percent)
    }
}

pub fn heart_risk(systolic: u32, cholesterol: u32, smoker: bool) -> Option<HeartRisk> {
    if systolic == 0 || cholesterol == 0 {
        return None;
    }
    let mut percent = 0;
    if systolic > 140 {
        percent += 30;
    } else if systolic > 120 {
        percent += 15;
    }
    if cholesterol > 240 {
        percent += 25;
    } else if cholesterol > 200 {
        percent += 10;
    }
    if smoker {
        percent += 25;
    }
    let level = match percent {
        p if p > 50 => RiskLevel::High,
        p if p > 25 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    };
    Some(HeartRisk { percent, level })
}

// ==================== Water ====================

/// Daily water intake in litres: 33 ml per kg plus 350 ml per half hour
/// of exercise
pub fn daily_water_litres(weight_kg: f64, exercise_minutes: u32) -> Option<f64> {
    let base = positive(weight_kg)? * 0.033;
    let extra = f64::from(exercise_minutes) / 30.0 * 0.35;
    Some(base + extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_bmi_categories() {
        let normal = bmi(175.0, 70.0).unwrap();
        assert_eq!(normal.category, BmiCategory::Normal);
        assert_eq!(normal.to_string(), "Normal: 22.9");

        assert_eq!(bmi(180.0, 55.0).unwrap().category, BmiCategory::Underweight);
        assert_eq!(bmi(170.0, 80.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(bmi(160.0, 90.0).unwrap().category, BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_boundaries_belong_to_upper_band() {
        // 100 cm makes the BMI equal the weight
        assert_eq!(bmi(100.0, 18.5).unwrap().category, BmiCategory::Normal);
        assert_eq!(bmi(100.0, 25.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(bmi(100.0, 30.0).unwrap().category, BmiCategory::Obese);
    }

    #[test]
    fn test_missing_inputs_give_nothing() {
        assert!(bmi(0.0, 70.0).is_none());
        assert!(bmi(170.0, f64::NAN).is_none());
        assert!(daily_calories(0, 70.0, Sex::Male, ActivityLevel::Moderate).is_none());
        assert!(daily_calories(30, -1.0, Sex::Female, ActivityLevel::Moderate).is_none());
        assert!(heart_risk(0, 180, true).is_none());
        assert!(heart_risk(130, 0, false).is_none());
        assert!(daily_water_litres(0.0, 30).is_none());
    }

    #[test]
    fn test_daily_calories() {
        // 88.362 + 13.397*70 + 4.799*170 - 5.677*30 = 1671.672, times 1.55
        let male = daily_calories(30, 70.0, Sex::Male, ActivityLevel::Moderate).unwrap();
        assert!(close(male, 2591.0), "{male}");

        // 447.593 + 9.247*60 + 3.098*170 - 4.33*40 = 1355.873, times 1.2
        let female = daily_calories(40, 60.0, Sex::Female, ActivityLevel::Sedentary).unwrap();
        assert!(close(female, 1627.0), "{female}");
    }

    #[test]
    fn test_activity_from_param() {
        assert_eq!(ActivityLevel::from_param("veryActive"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_param("LIGHT"), ActivityLevel::Light);
        assert_eq!(ActivityLevel::from_param("couch"), ActivityLevel::Moderate);
        assert_eq!(Sex::from_param("F"), Some(Sex::Female));
        assert_eq!(Sex::from_param("x"), None);
    }

    #[test]
    fn test_heart_risk_points() {
        let low = heart_risk(115, 180, false).unwrap();
        assert_eq!((low.percent, low.level), (0, RiskLevel::Low));

        // Thresholds are strict: 140 and 240 fall in the lower bands
        let borderline = heart_risk(140, 240, false).unwrap();
        assert_eq!((borderline.percent, borderline.level), (25, RiskLevel::Low));

        let moderate = heart_risk(130, 210, true).unwrap();
        assert_eq!((moderate.percent, moderate.level), (50, RiskLevel::Moderate));

        let high = heart_risk(150, 250, true).unwrap();
        assert_eq!((high.percent, high.level), (80, RiskLevel::High));
        assert_eq!(high.to_string(), "High Risk: 80%");
    }

    #[test]
    fn test_daily_water() {
        let litres = daily_water_litres(70.0, 30).unwrap();
        assert!(close(litres, 2.66), "{litres}");
        let resting = daily_water_litres(70.0, 0).unwrap();
        assert!(close(resting, 2.31), "{resting}");
    }
}
