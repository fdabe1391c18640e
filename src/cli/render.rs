//! The `render` command: one report, no server.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::config::ServiceConfig;
use crate::constants::DEFAULT_DOWNLOAD_NAME;
use crate::core::ReportError;
use crate::service::ReportService;

/// Generate a report from a JSON object of fields.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// JSON file with the fields, or `-` to read standard input
    #[arg(value_name = "FIELDS")]
    pub fields: String,

    /// Where to write the PDF
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DOWNLOAD_NAME)]
    pub output: PathBuf,
}

impl RenderCommand {
    pub async fn execute(self, config: ServiceConfig) -> Result<()> {
        let raw = if self.fields == "-" {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await.context("Failed to read fields from stdin")?;
            raw
        } else {
            tokio::fs::read_to_string(&self.fields)
                .await
                .with_context(|| format!("Failed to read fields from {}", self.fields))?
        };

        let value: Value = serde_json::from_str(&raw).context("Fields are not valid JSON")?;
        let Value::Object(fields) = value else {
            return Err(ReportError::InvalidRequest {
                reason: "expected a JSON object of fields".to_string(),
            }
            .into());
        };

        let service = ReportService::from_config(&config);
        service.work_area().prepare()?;

        let artifact = service.generate(&fields).await?;
        let written = artifact.save_to(&self.output).await?;

        println!("{} {} ({} bytes)", "Wrote".green().bold(), self.output.display(), written);
        Ok(())
    }
}
