//! CSV encoding for survey and medication tables

use crate::decode::{StudySummary, SurveyRecord};
use crate::schema::{medication_columns, ColumnSchema};
use crate::types::value_to_text;
use std::borrow::Cow;

/// Line terminator for every emitted row
const LINE_END: &str = "\n";

/// CSV encoder with configurable delimiter
#[derive(Debug, Clone)]
pub struct CsvEncoder {
    /// Field delimiter
    delimiter: char,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvEncoder {
    /// Create a new CSV encoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV encoder with a custom delimiter
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Get the delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Encode a header and rows
    ///
    /// A header with zero columns still produces one (empty) header line.
    pub fn encode<I, R>(&self, header: &ColumnSchema, rows: I) -> String
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        let mut out = String::new();
        self.write_line(&mut out, header.columns());
        for row in rows {
            self.write_line(&mut out, row.as_ref());
        }
        out
    }

    /// Encode surveys against an inferred header
    pub fn encode_surveys(&self, header: &ColumnSchema, surveys: &[SurveyRecord]) -> String {
        self.encode(header, surveys.iter().map(|s| survey_row(header, s)))
    }

    /// Encode one medications row per medication time
    pub fn encode_medications(&self, summary: &StudySummary) -> String {
        self.encode(&medication_columns(), medication_rows(summary))
    }

    fn write_line(&self, out: &mut String, fields: &[String]) {
        let delimiter = self.delimiter.to_string();
        let line = fields
            .iter()
            .map(|f| self.escape_field(f))
            .collect::<Vec<_>>()
            .join(&delimiter);
        out.push_str(&line);
        out.push_str(LINE_END);
    }

    /// Quote a field if it contains the delimiter, a quote or a line break
    fn escape_field<'a>(&self, field: &'a str) -> Cow<'a, str> {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r');

        if needs_quotes {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }
}

/// Render a survey against a header; absent fields become empty cells
pub fn survey_row(header: &ColumnSchema, survey: &SurveyRecord) -> Vec<String> {
    header
        .columns()
        .iter()
        .map(|column| survey.get(column).map(value_to_text).unwrap_or_default())
        .collect()
}

/// Rows of the medications table
pub fn medication_rows(summary: &StudySummary) -> Vec<Vec<String>> {
    summary
        .medication_times
        .iter()
        .map(|time| {
            vec![
                summary.study_id.clone(),
                summary.trial_id.clone(),
                summary.patient_id.clone(),
                summary.device_id.clone(),
                time.clone(),
            ]
        })
        .collect()
}
