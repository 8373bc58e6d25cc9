//! Ingestion pipeline
//!
//! Wires the stages together for one document:
//!
//! ```text
//! notification -> object ref -> body -> StudyDocument -> output plan
//!                                                     -> writes  } concurrent
//!                                                     -> catalog }
//! ```
//!
//! Trigger, fetch and decode failures abort before anything is written.
//! Write and catalog failures are recorded in the [`IngestReport`].

mod types;

pub use types::IngestReport;

use crate::catalog::{CatalogSynchronizer, PartitionSync, SyncStatus};
use crate::decode::{DocumentDecoder, StudySummary};
use crate::error::Result;
use crate::output::{ObjectFetcher, OutputWriter};
use crate::trigger::{self, ObjectRef};
use chrono::Utc;
use serde_json::Value;
use std::time::Instant;

/// Handles uploaded study documents end to end
///
/// Holds long-lived client handles; build once and share across
/// invocations.
#[derive(Debug)]
pub struct Pipeline {
    fetcher: ObjectFetcher,
    decoder: DocumentDecoder,
    writer: OutputWriter,
    catalog: Option<CatalogSynchronizer>,
}

impl Pipeline {
    /// Create a pipeline without catalog registration
    pub fn new(fetcher: ObjectFetcher, writer: OutputWriter) -> Self {
        Self {
            fetcher,
            decoder: DocumentDecoder::new(),
            writer,
            catalog: None,
        }
    }

    /// Register partitions through a synchronizer
    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogSynchronizer) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    pub fn catalog(&self) -> Option<&CatalogSynchronizer> {
        self.catalog.as_ref()
    }

    /// Process a storage notification
    pub async fn handle_notification(&self, event: &Value) -> Result<IngestReport> {
        let object = trigger::parse_notification(event).inspect_err(|e| {
            tracing::error!("Rejected notification: {e}");
        })?;
        self.handle_object(&object).await
    }

    /// Fetch and process one uploaded object
    pub async fn handle_object(&self, object: &ObjectRef) -> Result<IngestReport> {
        tracing::info!("Processing upload {object}");
        let body = self.fetcher.fetch(object).await.inspect_err(|e| {
            tracing::error!("Aborting {object}: {e}");
        })?;
        self.process_body(&body, Some(object.clone())).await
    }

    /// Process a document body
    pub async fn process_body(
        &self,
        body: &str,
        source: Option<ObjectRef>,
    ) -> Result<IngestReport> {
        let start = Instant::now();

        let document = self.decoder.decode(body).inspect_err(|e| {
            tracing::error!("Failed to decode document: {e}");
        })?;
        let plan = self.writer.plan(&document)?;
        let summary = &document.summary;

        tracing::info!(
            study_id = %summary.study_id,
            trial_id = %summary.trial_id,
            patient_id = %summary.patient_id,
            "Writing {} objects",
            plan.files.len()
        );

        let (writes, partitions) =
            tokio::join!(self.writer.write(&plan), self.sync_catalog(summary));

        let report = IngestReport {
            source,
            study_id: summary.study_id.clone(),
            trial_id: summary.trial_id.clone(),
            patient_id: summary.patient_id.clone(),
            survey_count: document.surveys.len(),
            medication_rows: document.medication_count(),
            survey_columns: plan.survey_columns.columns().to_vec(),
            writes,
            partitions,
            duration_ms: start.elapsed().as_millis() as u64,
            processed_at: Utc::now(),
        };

        if report.is_complete() {
            tracing::info!(
                "Study {} ingested: {} objects written, {} partitions created",
                report.study_id,
                report.writes.written.len(),
                report.partitions_created()
            );
        } else {
            let failed_partitions = report
                .partitions
                .iter()
                .filter(|p| p.status == SyncStatus::Failed)
                .count();
            tracing::warn!(
                "Study {} ingested with {} failed writes and {failed_partitions} failed partitions",
                report.study_id,
                report.writes.failed.len()
            );
        }

        Ok(report)
    }

    async fn sync_catalog(&self, summary: &StudySummary) -> Vec<PartitionSync> {
        match &self.catalog {
            Some(catalog) => catalog.sync(summary).await,
            None => Vec::new(),
        }
    }
}
