//! CLI runner - executes commands

use crate::catalog::tables;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::{Error, Result, ResultExt};
use crate::output::Storage;
use crate::pipeline::Pipeline;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Handle { event } => self.handle(event).await,
            Commands::Ingest { file } => self.ingest(file).await,
            Commands::Serve { port } => {
                let pipeline = self.load_config()?.build_pipeline().await?;
                crate::cli::serve(Arc::new(pipeline), *port).await
            }
            Commands::Tables => self.tables(),
        }
    }

    /// Resolve configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let config = match &self.cli.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        Ok(self.apply_flags(config.with_env()))
    }

    fn apply_flags(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(output) = &self.cli.output {
            config.output = Some(output.clone());
        }
        if let Some(source) = &self.cli.source {
            config.source = Some(source.clone());
        }
        if let Some(kind) = self.cli.catalog {
            config.catalog.kind = kind;
        }
        config
    }

    async fn pipeline(&self) -> Result<Pipeline> {
        self.load_config()?.build_pipeline().await
    }

    /// Process a notification read from a file or stdin
    async fn handle(&self, event: &str) -> Result<()> {
        let body = if event == "-" {
            let mut body = String::new();
            tokio::io::stdin().read_to_string(&mut body).await?;
            body
        } else {
            fs::read_to_string(event)
                .with_context(|| format!("Failed to read event file '{event}'"))?
        };
        let event: Value = serde_json::from_str(&body)
            .map_err(|e| Error::trigger(format!("notification is not valid JSON: {e}")))?;

        let report = self.pipeline().await?.handle_notification(&event).await?;
        self.output_message(&report);
        Ok(())
    }

    /// Process a local document
    async fn ingest(&self, file: &Path) -> Result<()> {
        let body = fs::read_to_string(file)
            .with_context(|| format!("Failed to read document '{}'", file.display()))?;

        let report = self.pipeline().await?.process_body(&body, None).await?;
        self.output_message(&report);
        Ok(())
    }

    /// Print table definitions located under the configured output
    fn tables(&self) -> Result<()> {
        let config = self.load_config()?;
        let output = Storage::parse(config.output_url()?)?;
        let definitions = tables::delimited_tables(
            &config.catalog.survey_table,
            &config.catalog.medication_table,
            &tables::table_location(&output),
            config.csv_delimiter,
        );

        self.output_message(&serde_json::json!({
            "database": config.catalog.database,
            "tables": definitions,
        }));
        Ok(())
    }

    fn output_message<T: Serialize>(&self, msg: &T) {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg),
            OutputFormat::Pretty => serde_json::to_string_pretty(msg),
        };
        match rendered {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("Failed to serialize output: {e}"),
        }
    }
}
