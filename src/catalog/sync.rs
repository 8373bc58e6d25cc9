//! Catalog synchronizer
//!
//! Registers the CSV partitions of a study with the survey and medication
//! tables. Registration never fails the invocation: a partition that is
//! already registered is expected on re-delivery, anything else is logged
//! and reported.

use super::tables::{DEFAULT_MEDICATION_TABLE, DEFAULT_SURVEY_TABLE};
use super::types::{Catalog, PartitionInput, PartitionSync, SyncStatus};
use crate::decode::StudySummary;
use crate::error::Result;
use crate::output::Storage;
use crate::partition::{ContentType, FileType, PartitionKey};
use std::sync::Arc;

/// Registers study partitions with a catalog
#[derive(Debug, Clone)]
pub struct CatalogSynchronizer {
    catalog: Arc<dyn Catalog>,
    /// Store the partitions live in, used to build their locations
    output: Storage,
    survey_table: String,
    medication_table: String,
}

impl CatalogSynchronizer {
    /// Create a synchronizer using the default table names
    pub fn new(catalog: Arc<dyn Catalog>, output: Storage) -> Self {
        Self {
            catalog,
            output,
            survey_table: DEFAULT_SURVEY_TABLE.to_string(),
            medication_table: DEFAULT_MEDICATION_TABLE.to_string(),
        }
    }

    /// Override the table names
    #[must_use]
    pub fn with_tables(
        mut self,
        survey_table: impl Into<String>,
        medication_table: impl Into<String>,
    ) -> Self {
        self.survey_table = survey_table.into();
        self.medication_table = medication_table.into();
        self
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Partition location registered for a key, with trailing slash
    pub fn location(&self, key: &PartitionKey) -> String {
        self.output.location(&format!("{}/", key.prefix()))
    }

    /// Register both CSV partitions of a study concurrently
    pub async fn sync(&self, summary: &StudySummary) -> Vec<PartitionSync> {
        let surveys = PartitionKey::for_summary(summary, FileType::CsvData, ContentType::Surveys);
        let medications =
            PartitionKey::for_summary(summary, FileType::CsvData, ContentType::Medications);

        let (surveys, medications) = tokio::join!(
            self.sync_table(&self.survey_table, &surveys),
            self.sync_table(&self.medication_table, &medications),
        );
        vec![surveys, medications]
    }

    async fn sync_table(&self, table: &str, key: &PartitionKey) -> PartitionSync {
        let values = key.values();
        let location = self.location(key);

        let (status, error) = match self.register(table, &values, &location).await {
            Ok(()) => {
                tracing::info!(table, location = %location, "Registered partition");
                (SyncStatus::Created, None)
            }
            Err(e) if e.is_partition_exists() => {
                tracing::info!(table, location = %location, "Partition already registered");
                (SyncStatus::AlreadyExists, None)
            }
            Err(e) => {
                tracing::warn!(table, location = %location, "Partition registration failed: {e}");
                (SyncStatus::Failed, Some(e.to_string()))
            }
        };

        PartitionSync {
            table: table.to_string(),
            values,
            location,
            status,
            error,
        }
    }

    async fn register(&self, table: &str, values: &[String], location: &str) -> Result<()> {
        let descriptor = self.catalog.get_storage_descriptor(table).await?;
        let input = PartitionInput::new(values.to_vec(), descriptor.with_location(location));
        self.catalog.create_partition(table, input).await
    }
}
