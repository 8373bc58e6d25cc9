//! Partition key module
//!
//! Derives the hierarchical storage layout of the lake.
//!
//! # Overview
//!
//! Every output of a study lands under a Hive-style prefix built from the
//! study summary plus a `(file_type, content_type)` pair:
//!
//! ```text
//! trials/trial_id=<T>/patient_id=<P>/file_type=csv_data/study_id=<S>/content_type=surveys/surveys.csv
//! trials/trial_id=<T>/patient_id=<P>/file_type=csv_data/study_id=<S>/content_type=medications/medications.csv
//! trials/trial_id=<T>/patient_id=<P>/file_type=json_data/content_type=surveys/<survey_id>.json
//! trials/trial_id=<T>/patient_id=<P>/file_type=json_data/content_type=summaries/<study_id>.json
//! ```
//!
//! The same key yields the value vector registered with the catalog.

mod types;

pub use types::{ContentType, FileType, PartitionKey, LAKE_ROOT, PARTITION_COLUMNS};

#[cfg(test)]
mod tests;
