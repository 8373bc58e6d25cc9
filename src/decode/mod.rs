//! Document decoder module
//!
//! Parses an uploaded study document into typed parts.
//!
//! # Overview
//!
//! A document carries exactly one `study_summary` and an optional
//! `surveys` mapping:
//!
//! ```text
//! { "study_summary": {"study_id","trial_id","patient_id","device_id","medication_times":[..]},
//!   "surveys": { "<survey_id>": {"trial_id","patient_id", ...} } }
//! ```
//!
//! The summary is required; the survey mapping may be absent.

mod document;
mod types;

pub use document::{
    DocumentDecoder, MEDICATION_TIMES_FIELD, REQUIRED_SUMMARY_FIELDS, SUMMARY_FIELD,
    SURVEYS_FIELD,
};
pub use types::{StudyDocument, StudySummary, SurveyRecord};
