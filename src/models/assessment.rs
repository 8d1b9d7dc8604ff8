use serde::{Deserialize, Serialize};

use super::PatientId;

/// The payload submitted to `/submit-assessment`.
///
/// Each list holds patient ids in first-encounter order, in the JSON type
/// the API sent them in. A patient is listed at most once per list;
/// repeats only appear when the API itself returned the same record twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResults {
    pub high_risk_patients: Vec<PatientId>,
    pub fever_patients: Vec<PatientId>,
    pub data_quality_issues: Vec<PatientId>,
}

impl AssessmentResults {
    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            high_risk: self.high_risk_patients.len(),
            fever: self.fever_patients.len(),
            data_quality: self.data_quality_issues.len(),
        }
    }
}

/// List sizes, for the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentSummary {
    pub high_risk: usize,
    pub fever: usize,
    pub data_quality: usize,
}

impl std::fmt::Display for AssessmentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} high risk, {} fever, {} data quality",
            self.high_risk, self.fever, self.data_quality
        )
    }
}
