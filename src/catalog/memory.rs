//! In-process catalog
//!
//! Holds table definitions and registered partitions in memory. Used for
//! local runs and tests where no managed catalog is reachable.

use super::types::{Catalog, PartitionInput, StorageDescriptor, TableDefinition};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug)]
struct TableState {
    definition: TableDefinition,
    partitions: BTreeMap<Vec<String>, StorageDescriptor>,
}

/// Catalog kept in process memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<HashMap<String, TableState>>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the given tables
    pub fn with_tables(definitions: impl IntoIterator<Item = TableDefinition>) -> Self {
        let tables = definitions
            .into_iter()
            .map(|definition| {
                (
                    definition.name.clone(),
                    TableState {
                        definition,
                        partitions: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Add or replace a table
    pub async fn create_table(&self, definition: TableDefinition) {
        self.tables.write().await.insert(
            definition.name.clone(),
            TableState {
                definition,
                partitions: BTreeMap::new(),
            },
        );
    }

    /// Names of all tables, sorted
    pub async fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered partition values of a table, in sorted order
    pub async fn partitions(&self, table: &str) -> Vec<Vec<String>> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|state| state.partitions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Descriptor of one registered partition
    pub async fn partition(&self, table: &str, values: &[String]) -> Option<StorageDescriptor> {
        self.tables
            .read()
            .await
            .get(table)
            .and_then(|state| state.partitions.get(values).cloned())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_storage_descriptor(&self, table: &str) -> Result<StorageDescriptor> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|state| state.definition.storage_descriptor.clone())
            .ok_or_else(|| Error::TableNotFound {
                table: table.to_string(),
            })
    }

    async fn create_partition(&self, table: &str, input: PartitionInput) -> Result<()> {
        let mut tables = self.tables.write().await;
        let state = tables.get_mut(table).ok_or_else(|| Error::TableNotFound {
            table: table.to_string(),
        })?;

        let expected = state.definition.partition_keys.len();
        if input.values.len() != expected {
            return Err(Error::invalid_descriptor(
                table,
                format!(
                    "expected {expected} partition values, got {}",
                    input.values.len()
                ),
            ));
        }
        if input.storage_descriptor.location.is_none() {
            return Err(Error::invalid_descriptor(table, "partition has no location"));
        }
        if state.partitions.contains_key(&input.values) {
            return Err(Error::PartitionExists {
                table: table.to_string(),
                values: input.values,
            });
        }

        state
            .partitions
            .insert(input.values, input.storage_descriptor);
        Ok(())
    }
}
