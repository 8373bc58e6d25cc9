//! Output module
//!
//! Handles reading uploads and writing the partitioned lake layout.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Opening object stores from URLs (S3, R2, GCS, Azure, local, memory)
//! - Fetching uploaded documents referenced by notifications
//! - Encoding survey and medication tables as CSV
//! - Fan-out writing of every object a document produces

mod csv;
mod fetcher;
mod storage;
mod writer;

pub use csv::{medication_rows, survey_row, CsvEncoder};
pub use fetcher::ObjectFetcher;
pub use storage::{Storage, CSV_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use writer::{
    OutputFile, OutputPlan, OutputWriter, WriteFailure, WriteReport, MEDICATIONS_CSV, SURVEYS_CSV,
};
