//! Partition types
//!
//! Defines the partition key and its two projections: the storage prefix
//! and the catalog value vector. Both are computed from the same fields so
//! they cannot drift apart.

use crate::decode::StudySummary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root directory of the lake layout
pub const LAKE_ROOT: &str = "trials";

/// Partition column names, in catalog order
pub const PARTITION_COLUMNS: [&str; 5] = [
    "trial_id",
    "patient_id",
    "file_type",
    "study_id",
    "content_type",
];

/// Storage format of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Derived CSV tables
    CsvData,
    /// Per-entity JSON objects
    JsonData,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::CsvData => "csv_data",
            FileType::JsonData => "json_data",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity stored in a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Surveys,
    Medications,
    Summaries,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Surveys => "surveys",
            ContentType::Medications => "medications",
            ContentType::Summaries => "summaries",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hive-style partition key for one output of a study
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKey {
    pub trial_id: String,
    pub patient_id: String,
    pub file_type: FileType,
    pub study_id: String,
    pub content_type: ContentType,
}

impl PartitionKey {
    /// Create a partition key from its parts
    pub fn new(
        trial_id: impl Into<String>,
        patient_id: impl Into<String>,
        file_type: FileType,
        study_id: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            trial_id: trial_id.into(),
            patient_id: patient_id.into(),
            file_type,
            study_id: study_id.into(),
            content_type,
        }
    }

    /// Derive the key for a study summary
    pub fn for_summary(
        summary: &StudySummary,
        file_type: FileType,
        content_type: ContentType,
    ) -> Self {
        Self::new(
            &summary.trial_id,
            &summary.patient_id,
            file_type,
            &summary.study_id,
            content_type,
        )
    }

    /// Storage prefix (without trailing slash)
    ///
    /// - CSV: `trials/trial_id=T/patient_id=P/file_type=csv_data/study_id=S/content_type=C`
    /// - JSON: `trials/trial_id=T/patient_id=P/file_type=json_data/content_type=C`
    ///
    /// JSON objects are keyed by entity id below the prefix, so the study
    /// segment is omitted there.
    pub fn prefix(&self) -> String {
        let mut segments = vec![
            LAKE_ROOT.to_string(),
            format!("trial_id={}", self.trial_id),
            format!("patient_id={}", self.patient_id),
            format!("file_type={}", self.file_type),
        ];
        if self.file_type == FileType::CsvData {
            segments.push(format!("study_id={}", self.study_id));
        }
        segments.push(format!("content_type={}", self.content_type));
        segments.join("/")
    }

    /// Full object key for a file inside this partition
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.prefix())
    }

    /// Partition values in catalog column order
    pub fn values(&self) -> Vec<String> {
        vec![
            self.trial_id.clone(),
            self.patient_id.clone(),
            self.file_type.as_str().to_string(),
            self.study_id.clone(),
            self.content_type.as_str().to_string(),
        ]
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}
