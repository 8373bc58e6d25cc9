//! Document types
//!
//! Typed views over an uploaded study document. The raw JSON objects are
//! kept alongside the extracted fields so per-entity outputs can be
//! written back verbatim.

use crate::types::{JsonObject, JsonValue};
use serde::Serialize;

/// Summary section of a study document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudySummary {
    pub study_id: String,
    pub trial_id: String,
    pub patient_id: String,
    pub device_id: String,
    /// Medication timestamps in document order (empty when absent)
    pub medication_times: Vec<String>,
    /// The `study_summary` object exactly as uploaded
    #[serde(skip)]
    pub raw: JsonObject,
}

impl StudySummary {
    /// The summary object as a JSON value
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.raw.clone())
    }
}

/// A single survey entry, keyed by its survey id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRecord {
    pub survey_id: String,
    /// Survey fields in document order
    pub fields: JsonObject,
}

impl SurveyRecord {
    /// Create a survey record
    pub fn new(survey_id: impl Into<String>, fields: JsonObject) -> Self {
        Self {
            survey_id: survey_id.into(),
            fields,
        }
    }

    /// Look up a field
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Field names in document order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The survey object as a JSON value
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }
}

/// A decoded study document
#[derive(Debug, Clone, PartialEq)]
pub struct StudyDocument {
    pub summary: StudySummary,
    /// Surveys in the iteration order of the `surveys` mapping
    pub surveys: Vec<SurveyRecord>,
}

impl StudyDocument {
    /// Find a survey by id
    pub fn survey(&self, survey_id: &str) -> Option<&SurveyRecord> {
        self.surveys.iter().find(|s| s.survey_id == survey_id)
    }

    /// Number of medication rows this document produces
    pub fn medication_count(&self) -> usize {
        self.summary.medication_times.len()
    }
}
