//! Risk classification of fetched patients.
//!
//! Each patient gets three independent sub-scores (age, temperature,
//! blood pressure). Malformed or missing fields never fail the run: they
//! zero the affected sub-score and put the patient on the data-quality list.

pub mod scoring;

use crate::models::{AssessmentResults, Patient, PatientId};
use scoring::{age_score, blood_pressure_score, fever_points, temperature_reading};

/// Total score at or above which a patient is high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 4;

/// Why a field could not be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQualityIssue {
    /// `age` absent, null, or not a number.
    InvalidAge,
    /// `temperature` present but neither a number nor a string with a leading number.
    InvalidTemperature,
    /// `temperature` absent or null.
    MissingTemperature,
    /// `blood_pressure` absent, not a string, or not `"<sys>/<dia>"`.
    InvalidBloodPressure,
}

/// Per-patient breakdown behind the three output lists.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientAssessment {
    pub patient_id: PatientId,
    pub age_points: u32,
    pub temperature_points: u32,
    pub blood_pressure_points: u32,
    pub has_fever: bool,
    pub issues: Vec<DataQualityIssue>,
}

impl PatientAssessment {
    pub fn total_score(&self) -> u32 {
        self.age_points + self.temperature_points + self.blood_pressure_points
    }

    pub fn is_high_risk(&self) -> bool {
        self.total_score() >= HIGH_RISK_THRESHOLD
    }

    pub fn has_data_quality_issue(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Score one patient.
pub fn assess_patient(patient: &Patient) -> PatientAssessment {
    let mut issues = Vec::new();

    let age = age_score(patient.age.as_ref());
    issues.extend(age.issue);

    let (temperature_points, has_fever) = match temperature_reading(patient.temperature.as_ref()) {
        Ok(reading) => fever_points(reading),
        Err(issue) => {
            issues.push(issue);
            (0, false)
        }
    };

    let bp = blood_pressure_score(patient.blood_pressure_reading());
    issues.extend(bp.issue);

    PatientAssessment {
        patient_id: patient.patient_id.clone(),
        age_points: age.points,
        temperature_points,
        blood_pressure_points: bp.points,
        has_fever,
        issues,
    }
}

/// Classify every patient, preserving input order within each list.
pub fn analyze(patients: &[Patient]) -> AssessmentResults {
    patients
        .iter()
        .map(assess_patient)
        .fold(AssessmentResults::default(), |mut results, assessment| {
            if assessment.is_high_risk() {
                results.high_risk_patients.push(assessment.patient_id.clone());
            }
            if assessment.has_fever {
                results.fever_patients.push(assessment.patient_id.clone());
            }
            if assessment.has_data_quality_issue() {
                results.data_quality_issues.push(assessment.patient_id);
            }
            results
        })
}
