//! AWS Glue catalog backend

use super::types::{Catalog, Column, PartitionInput, SerdeInfo, StorageDescriptor};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::types as glue;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Catalog backed by an AWS Glue database
///
/// Table descriptors read by `GetTable` are kept in their native form so that
/// partitions copy every field of the table layout, not only the ones the
/// neutral descriptor models.
#[derive(Debug, Clone)]
pub struct GlueCatalog {
    client: aws_sdk_glue::Client,
    database: String,
    descriptors: Arc<RwLock<HashMap<String, glue::StorageDescriptor>>>,
}

impl GlueCatalog {
    /// Wrap an existing Glue client
    pub fn new(client: aws_sdk_glue::Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
            descriptors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Build a client from the default AWS credential and region chain
    pub async fn from_env(database: impl Into<String>) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(aws_sdk_glue::Client::new(&sdk_config), database)
    }

    /// Database holding the tables
    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl Catalog for GlueCatalog {
    fn name(&self) -> &str {
        "glue"
    }

    async fn get_storage_descriptor(&self, table: &str) -> Result<StorageDescriptor> {
        let output = self
            .client
            .get_table()
            .database_name(&self.database)
            .name(table)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_entity_not_found_exception())
                {
                    Error::TableNotFound {
                        table: table.to_string(),
                    }
                } else {
                    Error::catalog(format!(
                        "GetTable {}.{table} failed: {}",
                        self.database,
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        let descriptor = output
            .table()
            .and_then(|t| t.storage_descriptor())
            .ok_or_else(|| Error::invalid_descriptor(table, "table has no storage descriptor"))?;

        self.descriptors
            .write()
            .await
            .insert(table.to_string(), descriptor.clone());
        Ok(from_glue(descriptor))
    }

    async fn create_partition(&self, table: &str, input: PartitionInput) -> Result<()> {
        let cached = self.descriptors.read().await.get(table).cloned();
        let storage_descriptor = match cached {
            Some(descriptor) => {
                partition_descriptor(descriptor, input.storage_descriptor.location.clone())
            }
            None => to_glue(table, input.storage_descriptor)?,
        };

        let partition = glue::PartitionInput::builder()
            .set_values(Some(input.values.clone()))
            .storage_descriptor(storage_descriptor)
            .build();

        self.client
            .create_partition()
            .database_name(&self.database)
            .table_name(table)
            .partition_input(partition)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(e) if e.is_already_exists_exception() => Error::PartitionExists {
                    table: table.to_string(),
                    values: input.values,
                },
                Some(e) if e.is_entity_not_found_exception() => Error::TableNotFound {
                    table: table.to_string(),
                },
                _ => Error::catalog(format!(
                    "CreatePartition {}.{table} failed: {}",
                    self.database,
                    DisplayErrorContext(&err)
                )),
            })?;

        Ok(())
    }
}

// ============================================================================
// Descriptor Conversion
// ============================================================================

/// The table descriptor with only its location replaced
fn partition_descriptor(
    mut table: glue::StorageDescriptor,
    location: Option<String>,
) -> glue::StorageDescriptor {
    table.location = location;
    table
}

fn from_glue(sd: &glue::StorageDescriptor) -> StorageDescriptor {
    StorageDescriptor {
        location: sd.location().map(str::to_string),
        columns: sd
            .columns()
            .iter()
            .map(|c| Column::new(c.name(), c.r#type().unwrap_or("string")))
            .collect(),
        input_format: sd.input_format().map(str::to_string),
        output_format: sd.output_format().map(str::to_string),
        serde_info: sd.serde_info().map(|info| SerdeInfo {
            serialization_library: info.serialization_library().map(str::to_string),
            parameters: info.parameters().map(sorted).unwrap_or_default(),
        }),
        parameters: sd.parameters().map(sorted).unwrap_or_default(),
    }
}

fn to_glue(table: &str, sd: StorageDescriptor) -> Result<glue::StorageDescriptor> {
    let columns = sd
        .columns
        .into_iter()
        .map(|c| {
            glue::Column::builder()
                .name(c.name)
                .r#type(c.data_type)
                .build()
                .map_err(|e| Error::invalid_descriptor(table, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let serde_info = sd.serde_info.map(|info| {
        glue::SerDeInfo::builder()
            .set_serialization_library(info.serialization_library)
            .set_parameters(non_empty(info.parameters))
            .build()
    });

    Ok(glue::StorageDescriptor::builder()
        .set_columns(Some(columns))
        .set_location(sd.location)
        .set_input_format(sd.input_format)
        .set_output_format(sd.output_format)
        .set_serde_info(serde_info)
        .set_parameters(non_empty(sd.parameters))
        .build())
}

fn sorted(map: &HashMap<String, String>) -> BTreeMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn non_empty(map: BTreeMap<String, String>) -> Option<HashMap<String, String>> {
    (!map.is_empty()).then(|| map.into_iter().collect())
}
