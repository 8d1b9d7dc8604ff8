//! Sub-score rules. Thresholds are fixed business rules, not configuration.

use serde_json::Value;

use super::DataQualityIssue;
use crate::models::numeric::leading_float;
use crate::models::BloodPressure;

/// Age above this scores 2.
pub const SENIOR_AGE: f64 = 65.0;
/// Age from this up to `SENIOR_AGE` inclusive scores 1.
pub const MIDDLE_AGE: f64 = 45.0;

/// Temperature at or above this (°F) scores 2.
pub const HIGH_FEVER_F: f64 = 101.0;
/// Temperature at or above this (°F) scores 1. Both bands count as fever.
pub const LOW_FEVER_F: f64 = 99.6;

/// Outcome of one sub-score: points, plus the issue that zeroed it if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScore {
    pub points: u32,
    pub issue: Option<DataQualityIssue>,
}

impl SubScore {
    fn points(points: u32) -> Self {
        Self {
            points,
            issue: None,
        }
    }

    fn flagged(issue: DataQualityIssue) -> Self {
        Self { points: 0, issue: Some(issue) }
    }
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

pub fn age_score(age: Option<&Value>) -> SubScore {
    let Some(age) = age.and_then(Value::as_f64) else {
        return SubScore::flagged(DataQualityIssue::InvalidAge);
    };

    if age > SENIOR_AGE {
        SubScore::points(2)
    } else if age >= MIDDLE_AGE {
        SubScore::points(1)
    } else {
        SubScore::points(0)
    }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Temperature reading in °F, coerced from a number or from the leading
/// number of a string (`"101.2F"` reads as 101.2).
pub fn temperature_reading(temperature: Option<&Value>) -> Result<f64, DataQualityIssue> {
    match temperature {
        Some(Value::Number(n)) => n.as_f64().ok_or(DataQualityIssue::InvalidTemperature),
        Some(Value::String(s)) => leading_float(s).ok_or(DataQualityIssue::InvalidTemperature),
        Some(Value::Null) | None => Err(DataQualityIssue::MissingTemperature),
        Some(_) => Err(DataQualityIssue::InvalidTemperature),
    }
}

/// Points for a valid reading, and whether it counts as fever.
pub fn fever_points(temperature_f: f64) -> (u32, bool) {
    if temperature_f >= HIGH_FEVER_F {
        (2, true)
    } else if temperature_f >= LOW_FEVER_F {
        (1, true)
    } else {
        (0, false)
    }
}

// ---------------------------------------------------------------------------
// Blood pressure
// ---------------------------------------------------------------------------

/// Points for a parsed reading. Rules are checked from most to least
/// severe and the first match wins.
pub fn blood_pressure_points(bp: BloodPressure) -> u32 {
    let BloodPressure {
        systolic,
        diastolic,
    } = bp;

    if systolic >= 140 || diastolic >= 90 {
        3
    } else if systolic >= 130 || diastolic >= 80 {
        2
    } else if systolic >= 120 && diastolic < 80 {
        1
    } else {
        0
    }
}

pub fn blood_pressure_score(reading: Option<BloodPressure>) -> SubScore {
    match reading {
        Some(bp) => SubScore::points(blood_pressure_points(bp)),
        None => SubScore::flagged(DataQualityIssue::InvalidBloodPressure),
    }
}
