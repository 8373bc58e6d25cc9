//! Catalog module
//!
//! Keeps the metadata catalog aware of the CSV partitions the pipeline
//! writes, so the survey and medication tables can be queried in place.
//!
//! # Overview
//!
//! - [`Catalog`]: backend seam (`get_storage_descriptor`, `create_partition`)
//! - [`GlueCatalog`]: AWS Glue
//! - [`MemoryCatalog`]: in-process, seeded from the built-in [`tables`]
//! - [`CatalogSynchronizer`]: registers both CSV partitions of a study

mod glue;
mod memory;
mod sync;
pub mod tables;
mod types;

pub use glue::GlueCatalog;
pub use memory::MemoryCatalog;
pub use sync::CatalogSynchronizer;
pub use types::{
    Catalog, Column, PartitionIndex, PartitionInput, PartitionSync, SerdeInfo, StorageDescriptor,
    SyncStatus, TableDefinition,
};

#[cfg(test)]
mod tests;
