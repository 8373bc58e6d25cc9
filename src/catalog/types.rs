//! Catalog types
//!
//! Backend-neutral views of table metadata. Both the Glue and in-memory
//! backends speak in these types.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Serde parameter holding the field delimiter
pub const FIELD_DELIMITER_PARAM: &str = "field.delim";

/// A typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    /// Create a string column
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, "string")
    }
}

/// Serializer/deserializer settings of a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialization_library: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

/// Physical layout of a table or partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serde_info: Option<SerdeInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

impl StorageDescriptor {
    /// Copy of this descriptor pointing at another location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Declare the field delimiter of delimited text files
    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.serde_info
            .get_or_insert_with(SerdeInfo::default)
            .parameters
            .insert(FIELD_DELIMITER_PARAM.to_string(), delimiter.to_string());
        self
    }

    /// Declared field delimiter, if any
    pub fn field_delimiter(&self) -> Option<&str> {
        self.serde_info
            .as_ref()
            .and_then(|info| info.parameters.get(FIELD_DELIMITER_PARAM))
            .map(String::as_str)
    }
}

/// A partition to register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInput {
    /// Values in partition-key order
    pub values: Vec<String>,
    pub storage_descriptor: StorageDescriptor,
}

impl PartitionInput {
    pub fn new(values: Vec<String>, storage_descriptor: StorageDescriptor) -> Self {
        Self {
            values,
            storage_descriptor,
        }
    }
}

/// Named index over partition keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionIndex {
    pub name: String,
    pub keys: Vec<String>,
}

/// Full definition of a catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub partition_keys: Vec<Column>,
    pub partition_index: PartitionIndex,
    /// Data columns, format and root location
    pub storage_descriptor: StorageDescriptor,
}

impl TableDefinition {
    /// Same table, storing files delimited by `delimiter`
    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.storage_descriptor = self.storage_descriptor.with_field_delimiter(delimiter);
        self
    }
}

/// Outcome of registering one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Created,
    AlreadyExists,
    Failed,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Created => write!(f, "created"),
            SyncStatus::AlreadyExists => write!(f, "already_exists"),
            SyncStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-table result of a catalog sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSync {
    pub table: String,
    pub values: Vec<String>,
    pub location: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metadata catalog holding partitioned tables
#[async_trait]
pub trait Catalog: Send + Sync + fmt::Debug {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Fetch the storage descriptor of a table
    async fn get_storage_descriptor(&self, table: &str) -> Result<StorageDescriptor>;

    /// Register a partition
    ///
    /// Fails with `Error::PartitionExists` when the values are already
    /// registered.
    async fn create_partition(&self, table: &str, input: PartitionInput) -> Result<()>;
}
