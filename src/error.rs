//! Error types for study-lake
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall in two groups: fatal ones abort the invocation before any
//! write is issued (trigger, fetch, decode), recoverable ones are caught
//! per operation by the output writer and the catalog synchronizer.

use thiserror::Error;

/// The main error type for study-lake
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Invocation Errors (fatal)
    // ============================================================================
    #[error("Malformed trigger notification: {message}")]
    Trigger { message: String },

    #[error("Failed to fetch {bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to decode document: {message}")]
    Decode { message: String },

    #[error("Document is missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    // ============================================================================
    // Output Errors (recovered per write)
    // ============================================================================
    #[error("Failed to write {key}: {message}")]
    Write { key: String, message: String },

    // ============================================================================
    // Catalog Errors (recovered per table)
    // ============================================================================
    #[error("Partition {values:?} already exists in table '{table}'")]
    PartitionExists { table: String, values: Vec<String> },

    #[error("Table '{table}' not found in catalog")]
    TableNotFound { table: String },

    #[error("Invalid storage descriptor for table '{table}': {message}")]
    InvalidDescriptor { table: String, message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config field error
    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a trigger error
    pub fn trigger(message: impl Into<String>) -> Self {
        Self::Trigger {
            message: message.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a missing document field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid document field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a generic catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create an invalid descriptor error
    pub fn invalid_descriptor(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the invocation
    ///
    /// Fatal errors are surfaced to the host so its redelivery policy can
    /// retry the whole document.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::Write { .. }
                | Error::PartitionExists { .. }
                | Error::TableNotFound { .. }
                | Error::InvalidDescriptor { .. }
                | Error::Catalog { .. }
        )
    }

    /// Whether this is a duplicate partition response
    pub fn is_partition_exists(&self) -> bool {
        matches!(self, Error::PartitionExists { .. })
    }
}

/// Result type alias for study-lake
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
