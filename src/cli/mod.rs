//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `handle` - Process one storage notification
//! - `ingest` - Process a local document
//! - `serve` - Start HTTP server mode
//! - `tables` - Print the built-in catalog tables

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve};
