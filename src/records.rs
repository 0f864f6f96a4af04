//! Health records and their plain-text export

use crate::triage::{Risk, TriageLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RECORDS_DISCLAIMER: &str =
    "⚕️ Disclaimer: This is an AI-generated summary. Consult your physician for medical decisions.";

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub date: NaiveDate,
    pub symptoms: Vec<String>,
    pub diagnosis: String,
    pub severity: Risk,
    pub triage_level: TriageLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub name: String,
    pub frequency: String,
    pub started: NaiveDate,
    pub status: MedicationStatus,
    pub prescriber: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabStatus {
    Normal,
    Borderline,
    Abnormal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabEntry {
    pub date: NaiveDate,
    pub test: String,
    pub facility: String,
    pub status: LabStatus,
    /// Headline values, e.g. "TSH: 2.8 mIU/L"
    pub key_values: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecords {
    pub symptoms: Vec<SymptomEntry>,
    pub medications: Vec<MedicationEntry>,
    pub labs: Vec<LabEntry>,
}

impl HealthRecords {
    /// Plain-text summary, one line per entry
    pub fn render_summary(&self, generated: NaiveDate) -> String {
        let mut lines = vec![
            "=== CHIKITSAK HEALTH RECORDS SUMMARY ===".to_string(),
            format!("Generated: {generated}"),
            String::new(),
            "--- SYMPTOM HISTORY ---".to_string(),
        ];
        lines.extend(self.symptoms.iter().map(|s| {
            format!(
                "{} | {} → {} ({})",
                s.date,
                s.symptoms.join(", "),
                s.diagnosis,
                s.severity
            )
        }));

        lines.push(String::new());
        lines.push("--- MEDICATION LOGS ---".to_string());
        lines.extend(self.medications.iter().map(|m| {
            format!(
                "{} | {} | {:?} | By: {}",
                m.name, m.frequency, m.status, m.prescriber
            )
        }));

        lines.push(String::new());
        lines.push("--- LAB RESULTS ---".to_string());
        lines.extend(
            self.labs
                .iter()
                .map(|l| format!("{} | {} | {:?} | {}", l.date, l.test, l.status, l.key_values)),
        );

        lines.push(String::new());
        lines.push(RECORDS_DISCLAIMER.to_string());
        lines.join("\n")
    }

    /// Write the summary into `dir`, returning the file path
    pub async fn export_to_dir(&self, dir: impl AsRef<Path>, date: NaiveDate) -> Result<PathBuf, RecordsError> {
        let path = dir.as_ref().join(export_file_name(date));
        tokio::fs::write(&path, self.render_summary(date))
            .await
            .map_err(|source| RecordsError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), "Health records exported");
        Ok(path)
    }

    /// Demo history shown before the user has records of their own
    pub fn sample() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
        let symptom = |date, symptoms: &[&str], diagnosis: &str, severity, triage_level| SymptomEntry {
            date,
            symptoms: symptoms.iter().map(ToString::to_string).collect(),
            diagnosis: diagnosis.to_string(),
            severity,
            triage_level,
        };
        let medication = |name: &str, frequency: &str, started, status, prescriber: &str| MedicationEntry {
            name: name.to_string(),
            frequency: frequency.to_string(),
            started,
            status,
            prescriber: prescriber.to_string(),
        };
        let lab = |date, test: &str, facility: &str, status, key_values: &str| LabEntry {
            date,
            test: test.to_string(),
            facility: facility.to_string(),
            status,
            key_values: key_values.to_string(),
        };

        Self {
            symptoms: vec![
                symptom(date(2026, 2, 18), &["Headache", "Mild fever"], "Viral infection", Risk::Medium, TriageLevel::Primary),
                symptom(date(2026, 2, 10), &["Cough", "Sore throat"], "Upper respiratory infection", Risk::Low, TriageLevel::SelfCare),
                symptom(date(2026, 1, 28), &["Chest tightness", "Shortness of breath"], "Anxiety attack", Risk::High, TriageLevel::Urgent),
                symptom(date(2026, 1, 15), &["Abdominal pain", "Nausea"], "Gastritis", Risk::Medium, TriageLevel::Primary),
            ],
            medications: vec![
                medication("Metformin 500mg", "Twice daily", date(2025, 11, 1), MedicationStatus::Active, "Dr. Patel"),
                medication("Amlodipine 5mg", "Once daily", date(2025, 9, 15), MedicationStatus::Active, "Dr. Sharma"),
                medication("Azithromycin 250mg", "Once daily × 5 days", date(2026, 2, 10), MedicationStatus::Completed, "Dr. Gupta"),
                medication("Pantoprazole 40mg", "Once daily (before food)", date(2026, 1, 16), MedicationStatus::Completed, "Dr. Patel"),
            ],
            labs: vec![
                lab(date(2026, 2, 15), "Complete Blood Count (CBC)", "Apollo Diagnostics", LabStatus::Normal, "WBC: 7,200 | RBC: 4.8M | Hgb: 14.2"),
                lab(date(2026, 1, 20), "HbA1c", "Dr. Lal PathLabs", LabStatus::Borderline, "HbA1c: 6.2% (Pre-diabetic range)"),
                lab(date(2025, 12, 10), "Lipid Panel", "SRL Diagnostics", LabStatus::Abnormal, "LDL: 145 mg/dL (High) | HDL: 42 mg/dL"),
                lab(date(2025, 11, 5), "Thyroid Panel (TSH)", "Apollo Diagnostics", LabStatus::Normal, "TSH: 2.8 mIU/L"),
            ],
        }
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("chikitsak_health_records_{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(day()), "chikitsak_health_records_2026-03-04.txt");
    }

    #[test]
    fn test_summary_layout() {
        let summary = HealthRecords::sample().render_summary(day());
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines[0], "=== CHIKITSAK HEALTH RECORDS SUMMARY ===");
        assert_eq!(lines[1], "Generated: 2026-03-04");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "--- SYMPTOM HISTORY ---");
        assert_eq!(lines[4], "2026-02-18 | Headache, Mild fever → Viral infection (Medium)");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "--- MEDICATION LOGS ---");
        assert_eq!(lines[10], "Metformin 500mg | Twice daily | Active | By: Dr. Patel");
        assert_eq!(lines[15], "--- LAB RESULTS ---");
        assert_eq!(
            lines[18],
            "2025-12-10 | Lipid Panel | Abnormal | LDL: 145 mg/dL (High) | HDL: 42 mg/dL"
        );
        assert_eq!(lines.last(), Some(&RECORDS_DISCLAIMER));
    }

    #[test]
    fn test_empty_records_keep_headings() {
        let summary = HealthRecords::default().render_summary(day());
        assert!(summary.contains("--- SYMPTOM HISTORY ---\n\n--- MEDICATION LOGS ---"));
        assert!(summary.ends_with(RECORDS_DISCLAIMER));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = HealthRecords::sample().export_to_dir(dir.path(), day()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "chikitsak_health_records_2026-03-04.txt");
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("=== CHIKITSAK HEALTH RECORDS SUMMARY ==="));
    }

    #[tokio::test]
    async fn test_export_to_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = HealthRecords::default()
            .export_to_dir(dir.path().join("missing"), day())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordsError::Write { .. }));
    }
}
