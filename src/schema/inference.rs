//! Column inference for survey and medication tables

use super::types::ColumnSchema;
use crate::decode::SurveyRecord;

/// Fixed columns of the medications table
pub const MEDICATION_COLUMNS: [&str; 5] = [
    "study_id",
    "trial_id",
    "patient_id",
    "device_id",
    "medication_time",
];

/// Schema inferrer for survey tables
///
/// Columns are captured once, from the first record, in that record's own
/// field order. Later records are assumed to share the same field set.
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    /// Log fields that later records carry but the header lacks
    report_dropped: bool,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInferrer {
    /// Create a new schema inferrer
    pub fn new() -> Self {
        Self {
            report_dropped: true,
        }
    }

    /// Enable/disable reporting of fields outside the inferred header
    #[must_use]
    pub fn with_dropped_field_report(mut self, enabled: bool) -> Self {
        self.report_dropped = enabled;
        self
    }

    /// Infer the survey header from a record sequence
    pub fn infer(&self, records: &[SurveyRecord]) -> ColumnSchema {
        let Some(first) = records.first() else {
            return ColumnSchema::empty();
        };

        let schema = ColumnSchema::new(first.field_names().map(ToString::to_string).collect());

        if self.report_dropped {
            for record in records.iter().skip(1) {
                let dropped = schema.uncovered(record.field_names());
                if !dropped.is_empty() {
                    tracing::debug!(
                        survey_id = %record.survey_id,
                        "Fields {dropped:?} are not in the survey header and will be dropped"
                    );
                }
            }
        }

        schema
    }
}

/// Infer the survey header with default settings
pub fn infer_columns(records: &[SurveyRecord]) -> ColumnSchema {
    SchemaInferrer::new().infer(records)
}

/// The fixed medications header
pub fn medication_columns() -> ColumnSchema {
    ColumnSchema::fixed(&MEDICATION_COLUMNS)
}
