pub mod assessment;
pub mod numeric;
pub mod patient;

pub use assessment::{AssessmentResults, AssessmentSummary};
pub use patient::{BloodPressure, Patient, PatientId};
