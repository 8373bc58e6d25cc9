//! Pipeline configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file,
//! then environment variables, then command-line flags.
//!
//! ```yaml
//! output: s3://processed-bucket
//! source: ./uploads          # optional, defaults to the notified bucket
//! csv_delimiter: ","
//! catalog:
//!   kind: glue               # glue | memory | disabled
//!   database: parkinsons_database
//!   survey_table: survey_table
//!   medication_table: medication_table
//! ```

use crate::catalog::tables::{
    self, DEFAULT_DATABASE, DEFAULT_MEDICATION_TABLE, DEFAULT_SURVEY_TABLE,
};
use crate::catalog::{Catalog, CatalogSynchronizer, GlueCatalog, MemoryCatalog};
use crate::error::{Error, Result};
use crate::output::{CsvEncoder, ObjectFetcher, OutputWriter, Storage};
use crate::pipeline::Pipeline;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Destination URL of the processed lake
pub const ENV_OUTPUT_URL: &str = "OUTPUT_URL";
/// Bucket name used when no output URL is set
pub const ENV_UPLOAD_BUCKET: &str = "UPLOAD_BUCKET";
/// Fixed source store for uploads
pub const ENV_SOURCE_URL: &str = "SOURCE_URL";
pub const ENV_CATALOG_KIND: &str = "CATALOG_KIND";
pub const ENV_CATALOG_DATABASE: &str = "CATALOG_DATABASE";

// ============================================================================
// Catalog Config
// ============================================================================

/// Which catalog backend registers partitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// AWS Glue
    #[default]
    Glue,
    /// In-process catalog seeded with the built-in tables
    Memory,
    /// No registration
    Disabled,
}

impl FromStr for CatalogKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "glue" => Ok(Self::Glue),
            "memory" => Ok(Self::Memory),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            other => Err(Error::config(format!(
                "Unknown catalog kind '{other}', expected glue, memory or disabled"
            ))),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glue => write!(f, "glue"),
            Self::Memory => write!(f, "memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub kind: CatalogKind,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_survey_table")]
    pub survey_table: String,

    #[serde(default = "default_medication_table")]
    pub medication_table: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            kind: CatalogKind::default(),
            database: default_database(),
            survey_table: default_survey_table(),
            medication_table: default_medication_table(),
        }
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_survey_table() -> String {
    DEFAULT_SURVEY_TABLE.to_string()
}

fn default_medication_table() -> String {
    DEFAULT_MEDICATION_TABLE.to_string()
}

// ============================================================================
// Pipeline Config
// ============================================================================

/// Top-level settings for building a [`Pipeline`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Output store URL
    #[serde(default)]
    pub output: Option<String>,

    /// Fixed source store URL; uploads are read from the notified bucket
    /// when unset
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default = "default_delimiter")]
    pub csv_delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: None,
            source: None,
            catalog: CatalogConfig::default(),
            csv_delimiter: default_delimiter(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply process environment variables
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Apply variables from a lookup function
    ///
    /// Set variables override file values. `UPLOAD_BUCKET` only applies
    /// when no output has been configured.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = lookup(ENV_OUTPUT_URL) {
            self.output = Some(url);
        } else if self.output.is_none() {
            self.output = lookup(ENV_UPLOAD_BUCKET).map(|bucket| format!("s3://{bucket}"));
        }
        if let Some(url) = lookup(ENV_SOURCE_URL) {
            self.source = Some(url);
        }
        if let Some(kind) = lookup(ENV_CATALOG_KIND) {
            match kind.parse() {
                Ok(kind) => self.catalog.kind = kind,
                Err(e) => tracing::warn!("Ignoring {ENV_CATALOG_KIND}: {e}"),
            }
        }
        if let Some(database) = lookup(ENV_CATALOG_DATABASE) {
            self.catalog.database = database;
        }
        self
    }

    /// Resolved output URL
    pub fn output_url(&self) -> Result<&str> {
        self.output
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::missing_config("output"))
    }

    /// Check that the configuration can build a pipeline
    pub fn validate(&self) -> Result<()> {
        self.output_url()?;

        if self.source.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(Error::config("source cannot be empty"));
        }
        if matches!(self.csv_delimiter, '"' | '\n' | '\r') {
            return Err(Error::config(format!(
                "Invalid CSV delimiter {:?}",
                self.csv_delimiter
            )));
        }

        let catalog = &self.catalog;
        if catalog.kind != CatalogKind::Disabled {
            if catalog.survey_table.is_empty() {
                return Err(Error::missing_config("catalog.survey_table"));
            }
            if catalog.medication_table.is_empty() {
                return Err(Error::missing_config("catalog.medication_table"));
            }
            if catalog.survey_table == catalog.medication_table {
                return Err(Error::config(
                    "catalog.survey_table and catalog.medication_table must differ",
                ));
            }
        }
        if catalog.kind == CatalogKind::Glue && catalog.database.is_empty() {
            return Err(Error::missing_config("catalog.database"));
        }

        Ok(())
    }

    /// Build the pipeline and its shared clients
    pub async fn build_pipeline(&self) -> Result<Pipeline> {
        self.validate()?;

        let output = Storage::parse(self.output_url()?)?;
        let fetcher = match &self.source {
            Some(url) => ObjectFetcher::fixed(Storage::parse(url)?),
            None => ObjectFetcher::per_bucket(),
        };
        let writer = OutputWriter::new(output.clone())
            .with_encoder(CsvEncoder::with_delimiter(self.csv_delimiter));

        let pipeline = Pipeline::new(fetcher, writer);
        let Some(catalog) = self.build_catalog(&output).await else {
            tracing::info!("Catalog registration disabled");
            return Ok(pipeline);
        };

        tracing::info!("Registering partitions with {} catalog", catalog.name());
        let sync = CatalogSynchronizer::new(catalog, output).with_tables(
            &self.catalog.survey_table,
            &self.catalog.medication_table,
        );
        Ok(pipeline.with_catalog(sync))
    }

    async fn build_catalog(&self, output: &Storage) -> Option<Arc<dyn Catalog>> {
        let config = &self.catalog;
        match config.kind {
            CatalogKind::Glue => Some(Arc::new(GlueCatalog::from_env(&config.database).await)),
            CatalogKind::Memory => Some(Arc::new(MemoryCatalog::with_tables(
                tables::delimited_tables(
                    &config.survey_table,
                    &config.medication_table,
                    &tables::table_location(output),
                    self.csv_delimiter,
                ),
            ))),
            CatalogKind::Disabled => None,
        }
    }
}
