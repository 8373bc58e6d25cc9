//! Fan-out output writer
//!
//! Plans every object a document produces, then writes them concurrently.
//! Each write stands alone: a failure is logged and recorded, siblings
//! still run, and nothing is rolled back.

use super::csv::CsvEncoder;
use super::storage::{Storage, CSV_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::decode::StudyDocument;
use crate::error::Result;
use crate::partition::{ContentType, FileType, PartitionKey};
use crate::schema::{ColumnSchema, SchemaInferrer};
use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;

/// File name of the surveys table
pub const SURVEYS_CSV: &str = "surveys.csv";

/// File name of the medications table
pub const MEDICATIONS_CSV: &str = "medications.csv";

/// One object to be written
#[derive(Debug, Clone)]
pub struct OutputFile {
    /// Object key relative to the output root
    pub key: String,
    /// Partition the object belongs to
    pub partition: PartitionKey,
    /// Encoded body
    pub body: Bytes,
    /// MIME type
    pub content_type: &'static str,
}

/// All objects derived from one document
#[derive(Debug, Clone)]
pub struct OutputPlan {
    /// Inferred survey header
    pub survey_columns: ColumnSchema,
    /// Objects in write order
    pub files: Vec<OutputFile>,
}

impl OutputPlan {
    /// Object keys in plan order
    pub fn keys(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.key.as_str()).collect()
    }
}

/// A write that did not go through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of a fan-out write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Keys written successfully
    pub written: Vec<String>,
    /// Keys that failed, with the reason
    pub failed: Vec<WriteFailure>,
}

impl WriteReport {
    /// Whether every planned write succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Check if a key was written
    pub fn contains(&self, key: &str) -> bool {
        self.written.iter().any(|k| k == key)
    }
}

/// Writes the lake layout for decoded documents
#[derive(Debug, Clone)]
pub struct OutputWriter {
    storage: Storage,
    encoder: CsvEncoder,
    inferrer: SchemaInferrer,
}

impl OutputWriter {
    /// Create a writer targeting a storage root
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            encoder: CsvEncoder::new(),
            inferrer: SchemaInferrer::new(),
        }
    }

    /// Use a specific CSV encoder
    #[must_use]
    pub fn with_encoder(mut self, encoder: CsvEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// The destination storage
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The CSV encoder used for derived tables
    pub fn encoder(&self) -> &CsvEncoder {
        &self.encoder
    }

    /// Build the write set for a document
    ///
    /// Order: surveys CSV, medications CSV, one JSON per survey, summary JSON.
    pub fn plan(&self, doc: &StudyDocument) -> Result<OutputPlan> {
        let summary = &doc.summary;
        let survey_columns = self.inferrer.infer(&doc.surveys);
        let mut files = Vec::with_capacity(doc.surveys.len() + 3);

        let surveys_csv = PartitionKey::for_summary(summary, FileType::CsvData, ContentType::Surveys);
        files.push(OutputFile {
            key: surveys_csv.object_key(SURVEYS_CSV),
            body: Bytes::from(self.encoder.encode_surveys(&survey_columns, &doc.surveys)),
            partition: surveys_csv,
            content_type: CSV_CONTENT_TYPE,
        });

        let medications_csv =
            PartitionKey::for_summary(summary, FileType::CsvData, ContentType::Medications);
        files.push(OutputFile {
            key: medications_csv.object_key(MEDICATIONS_CSV),
            body: Bytes::from(self.encoder.encode_medications(summary)),
            partition: medications_csv,
            content_type: CSV_CONTENT_TYPE,
        });

        let surveys_json =
            PartitionKey::for_summary(summary, FileType::JsonData, ContentType::Surveys);
        for survey in &doc.surveys {
            files.push(OutputFile {
                key: surveys_json.object_key(&format!("{}.json", survey.survey_id)),
                body: Bytes::from(serde_json::to_vec(&survey.fields)?),
                partition: surveys_json.clone(),
                content_type: JSON_CONTENT_TYPE,
            });
        }

        let summary_json =
            PartitionKey::for_summary(summary, FileType::JsonData, ContentType::Summaries);
        files.push(OutputFile {
            key: summary_json.object_key(&format!("{}.json", summary.study_id)),
            body: Bytes::from(serde_json::to_vec(&summary.raw)?),
            partition: summary_json,
            content_type: JSON_CONTENT_TYPE,
        });

        Ok(OutputPlan {
            survey_columns,
            files,
        })
    }

    /// Issue every planned write concurrently and collect the outcomes
    pub async fn write(&self, plan: &OutputPlan) -> WriteReport {
        let outcomes = join_all(plan.files.iter().map(|file| async move {
            let result = self
                .storage
                .put(&file.key, file.body.clone(), file.content_type)
                .await;
            (file.key.clone(), result)
        }))
        .await;

        let mut report = WriteReport::default();
        for (key, result) in outcomes {
            match result {
                Ok(location) => {
                    tracing::debug!("Wrote {location}");
                    report.written.push(key);
                }
                Err(e) => {
                    tracing::warn!(key = %key, "Write failed: {e}");
                    report.failed.push(WriteFailure {
                        key,
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Plan and write a document
    pub async fn write_document(&self, doc: &StudyDocument) -> Result<(OutputPlan, WriteReport)> {
        let plan = self.plan(doc)?;
        let report = self.write(&plan).await;
        Ok((plan, report))
    }
}
