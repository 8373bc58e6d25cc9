//! Study document decoder
//!
//! Turns the fetched body into a [`StudyDocument`], reporting precisely
//! which required field is absent instead of failing at point of use.

use super::types::{StudyDocument, StudySummary, SurveyRecord};
use crate::error::{Error, Result};
use crate::types::{value_to_text, JsonObject, JsonValue};

/// Key of the summary section
pub const SUMMARY_FIELD: &str = "study_summary";

/// Key of the survey mapping
pub const SURVEYS_FIELD: &str = "surveys";

/// Key of the medication timestamps within the summary
pub const MEDICATION_TIMES_FIELD: &str = "medication_times";

/// Required identifier fields of the summary
pub const REQUIRED_SUMMARY_FIELDS: [&str; 4] = ["study_id", "trial_id", "patient_id", "device_id"];

/// Decoder for uploaded study documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentDecoder;

impl DocumentDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate a document body
    pub fn decode(&self, body: &str) -> Result<StudyDocument> {
        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        self.decode_value(&value)
    }

    /// Validate an already parsed document
    pub fn decode_value(&self, value: &JsonValue) -> Result<StudyDocument> {
        let root = value
            .as_object()
            .ok_or_else(|| Error::decode("document root must be a JSON object"))?;

        let summary = decode_summary(root)?;
        let surveys = decode_surveys(root)?;

        for survey in &surveys {
            check_consistency(&summary, survey);
        }

        Ok(StudyDocument { summary, surveys })
    }
}

fn decode_summary(root: &JsonObject) -> Result<StudySummary> {
    let raw = match root.get(SUMMARY_FIELD) {
        None | Some(JsonValue::Null) => return Err(Error::missing_field(SUMMARY_FIELD)),
        Some(JsonValue::Object(map)) => map,
        Some(_) => {
            return Err(Error::invalid_field(
                SUMMARY_FIELD,
                "expected a JSON object",
            ))
        }
    };

    let [study_id, trial_id, patient_id, device_id] =
        REQUIRED_SUMMARY_FIELDS.map(|field| required_text(raw, field));

    Ok(StudySummary {
        study_id: study_id?,
        trial_id: trial_id?,
        patient_id: patient_id?,
        device_id: device_id?,
        medication_times: medication_times(raw)?,
        raw: raw.clone(),
    })
}

/// Read a required scalar field as text
fn required_text(summary: &JsonObject, field: &str) -> Result<String> {
    let path = format!("{SUMMARY_FIELD}.{field}");
    match summary.get(field) {
        None | Some(JsonValue::Null) => Err(Error::missing_field(path)),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(Error::invalid_field(path, "expected a string")),
    }
}

fn medication_times(summary: &JsonObject) -> Result<Vec<String>> {
    let path = format!("{SUMMARY_FIELD}.{MEDICATION_TIMES_FIELD}");
    match summary.get(MEDICATION_TIMES_FIELD) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::invalid_field(
                    format!("{path}[{i}]"),
                    "expected a timestamp string",
                )),
                other => Ok(value_to_text(other)),
            })
            .collect(),
        Some(_) => Err(Error::invalid_field(path, "expected an array")),
    }
}

fn decode_surveys(root: &JsonObject) -> Result<Vec<SurveyRecord>> {
    let map = match root.get(SURVEYS_FIELD) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Object(map)) => map,
        Some(_) => {
            return Err(Error::invalid_field(
                SURVEYS_FIELD,
                "expected an object keyed by survey id",
            ))
        }
    };

    map.iter()
        .map(|(survey_id, survey)| match survey {
            JsonValue::Object(fields) => Ok(SurveyRecord::new(survey_id, fields.clone())),
            _ => Err(Error::invalid_field(
                format!("{SURVEYS_FIELD}.{survey_id}"),
                "expected a JSON object",
            )),
        })
        .collect()
}

/// Surveys naming a different trial or patient are kept, only reported
fn check_consistency(summary: &StudySummary, survey: &SurveyRecord) {
    for (field, expected) in [
        ("trial_id", &summary.trial_id),
        ("patient_id", &summary.patient_id),
    ] {
        if let Some(actual) = survey.get(field).map(value_to_text) {
            if &actual != expected {
                tracing::warn!(
                    survey_id = %survey.survey_id,
                    "Survey {field} '{actual}' differs from study summary '{expected}'"
                );
            }
        }
    }
}
