//! Schema inference module
//!
//! Derives CSV column lists from decoded documents.
//!
//! # Features
//!
//! - **Survey Header**: taken from the first survey record, in its key order
//! - **Medication Header**: fixed five-column set
//! - **Homogeneity Check**: fields of later records missing from the header
//!   are reported, not added

mod inference;
mod types;

pub use inference::{infer_columns, medication_columns, SchemaInferrer, MEDICATION_COLUMNS};
pub use types::ColumnSchema;
