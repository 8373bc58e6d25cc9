//! CLI commands and argument parsing

use crate::config::CatalogKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Study lake ingestion CLI
#[derive(Parser, Debug)]
#[command(name = "study-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output destination (local path or cloud URL)
    /// Supports: /path, memory://, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Read uploads from this store instead of the notified bucket
    #[arg(short, long, global = true)]
    pub source: Option<String>,

    /// Catalog backend: glue, memory or disabled
    #[arg(long, global = true)]
    pub catalog: Option<CatalogKind>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process one storage notification
    Handle {
        /// Notification JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },

    /// Process a local study document, skipping trigger and fetch
    Ingest {
        /// Study document (JSON)
        file: PathBuf,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Print the built-in catalog table definitions
    Tables,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
