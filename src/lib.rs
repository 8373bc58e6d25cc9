// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Study Lake
//!
//! Ingests uploaded clinical survey study documents into a partitioned,
//! catalog-registered data lake.
//!
//! ## Features
//!
//! - **Trigger Handling**: Parses storage notifications and decodes object keys
//! - **Validated Decoding**: Typed study summary and survey records, verbatim JSON kept
//! - **Schema Inference**: Survey CSV header from the first record, fixed medication header
//! - **Hive Layout**: Deterministic `trials/trial_id=.../` partition prefixes
//! - **Fan-out Writes**: Concurrent, isolated, idempotent writes to S3, GCS, Azure or disk
//! - **Catalog Sync**: Partition registration in AWS Glue, duplicate tolerant
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use study_lake::{PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = PipelineConfig::default().with_env().build_pipeline().await?;
//!
//!     let event = serde_json::from_str(&std::fs::read_to_string("event.json")?)?;
//!     let report = pipeline.handle_notification(&event).await?;
//!     println!("{} objects written", report.writes.written.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌─────────┐   ┌────────────────────────────┐
//! │ Trigger  │ → │ Fetcher │ → │ Decoder │ → │ Schema + CSV + Partition   │
//! └──────────┘   └─────────┘   └─────────┘   └─────────────┬──────────────┘
//!                                                          │
//!                                    ┌─────────────────────┴───────────┐
//!                                    │ Output Writer │ Catalog Sync    │
//!                                    │ (fan-out)     │ (per table)     │
//!                                    └─────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Storage notification parsing
pub mod trigger;

/// Study document decoding
pub mod decode;

/// CSV column inference
pub mod schema;

/// Partition keys and storage prefixes
pub mod partition;

/// Object storage, CSV encoding and fan-out writes
pub mod output;

/// Metadata catalog registration
pub mod catalog;

/// End-to-end ingestion
pub mod pipeline;

/// Pipeline configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{CatalogConfig, CatalogKind, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{IngestReport, Pipeline};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
