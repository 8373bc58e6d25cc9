//! Pipeline types

use crate::catalog::{PartitionSync, SyncStatus};
use crate::output::WriteReport;
use crate::trigger::ObjectRef;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of one ingestion pass
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Uploaded object, when the document came through a notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ObjectRef>,
    pub study_id: String,
    pub trial_id: String,
    pub patient_id: String,
    pub survey_count: usize,
    pub medication_rows: usize,
    /// Header of the surveys table
    pub survey_columns: Vec<String>,
    pub writes: WriteReport,
    /// Empty when no catalog is configured
    pub partitions: Vec<PartitionSync>,
    pub duration_ms: u64,
    pub processed_at: DateTime<Utc>,
}

impl IngestReport {
    /// Whether every write and partition registration went through
    ///
    /// Partitions that already existed count as registered.
    pub fn is_complete(&self) -> bool {
        self.writes.is_complete()
            && self
                .partitions
                .iter()
                .all(|p| p.status != SyncStatus::Failed)
    }

    /// Number of partitions created by this pass
    pub fn partitions_created(&self) -> usize {
        self.partitions
            .iter()
            .filter(|p| p.status == SyncStatus::Created)
            .count()
    }
}
