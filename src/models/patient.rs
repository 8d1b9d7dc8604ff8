use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::numeric::leading_int;

/// A patient record as returned by the API.
///
/// Clinical fields stay as raw JSON: the API is not trusted to send the
/// documented types, and scoring needs to tell "wrong type" from "absent".
/// Fields scoring does not use (`name`, `gender`, `visit_date`,
/// `diagnosis`, ...) are kept verbatim in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: PatientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Patient {
    /// Patient with an id and no clinical data.
    pub fn new(patient_id: &str) -> Self {
        Self {
            patient_id: patient_id.into(),
            age: None,
            temperature: None,
            blood_pressure: None,
            details: Map::new(),
        }
    }

    /// Decode one item of a page batch.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn with_age(mut self, age: Value) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_temperature(mut self, temperature: Value) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_blood_pressure(mut self, blood_pressure: Value) -> Self {
        self.blood_pressure = Some(blood_pressure);
        self
    }

    /// Parsed blood pressure, `None` when absent, not a string, or malformed.
    pub fn blood_pressure_reading(&self) -> Option<BloodPressure> {
        self.blood_pressure
            .as_ref()
            .and_then(Value::as_str)
            .and_then(BloodPressure::parse)
    }
}

// ═══════════════════════════════════════════════════════════
// PatientId
// ═══════════════════════════════════════════════════════════

/// Opaque patient identifier, kept in the JSON type the API sent it in
/// so it is submitted back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PatientId {
    Text(String),
    Number(Number),
}

impl<'de> Deserialize<'de> for PatientId {
    /// Accept a non-empty string or a number; anything else is unusable.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) if !s.trim().is_empty() => Ok(PatientId::Text(s)),
            Value::Number(n) => Ok(PatientId::Number(n)),
            other => Err(de::Error::custom(format!("unusable patient_id: {other}"))),
        }
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        PatientId::Text(id.to_string())
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatientId::Text(s) => f.write_str(s),
            PatientId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl PartialEq<&str> for PatientId {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, PatientId::Text(s) if s == other)
    }
}

// ═══════════════════════════════════════════════════════════
// BloodPressure
// ═══════════════════════════════════════════════════════════

/// Systolic/diastolic pair from a `"<systolic>/<diastolic>"` reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

impl BloodPressure {
    /// Parse `"120/80"`. Only the first two `/`-separated parts are read,
    /// and each contributes its leading integer: `"120.5/80"` is 120/80,
    /// `"145 mmHg/92"` is 145/92.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.contains('/') {
            return None;
        }
        let mut parts = raw.split('/');
        let systolic = leading_int(parts.next()?)?;
        let diastolic = leading_int(parts.next()?)?;
        Some(Self {
            systolic,
            diastolic,
        })
    }
}
