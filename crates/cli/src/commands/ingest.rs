//! Ingest command handler.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppError, AppResult};
use clauseiq_engine::{ingest_paths, DocumentId, IngestOptions};
use std::path::PathBuf;

/// Ingest contract files or directories
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Files or directories to ingest
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Document id (only with a single file; replaces an existing document)
    #[arg(long)]
    pub id: Option<String>,

    /// Include patterns (path substring)
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude patterns (path substring)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Files processed at once (default: available parallelism)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {} paths", self.paths.len());

        let engine = open_engine(config)?;
        let options = IngestOptions {
            paths: self.paths.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            id: self.id.as_deref().map(DocumentId::new),
            concurrency: self.jobs,
        };

        let report = ingest_paths(engine, options).await?;

        if self.json {
            print_json(&report)?;
        } else {
            for file in &report.files {
                match (&file.document, &file.error) {
                    (Some(document), _) => println!(
                        "{}  {} ({} pages, {} passages, {} fields)",
                        document.id,
                        file.path.display(),
                        document.page_count,
                        file.passages,
                        file.fields_set
                    ),
                    (None, Some(error)) => println!("FAILED  {}: {}", file.path.display(), error),
                    (None, None) => {}
                }
            }
            println!(
                "Ingested {} of {} files ({} passages) in {:.2}s",
                report.stats.ingested,
                report.stats.files_seen,
                report.stats.passages,
                report.stats.duration_secs
            );
        }

        if report.stats.files_seen > 0 && report.stats.ingested == 0 {
            return Err(AppError::Other("no files were ingested".to_string()));
        }

        Ok(())
    }
}
