//! Documents command handler.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppResult};

/// List ingested documents
#[derive(Args, Debug)]
pub struct DocumentsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocumentsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing documents command");

        let engine = open_engine(config)?;
        let documents = engine.documents()?;

        if self.json {
            return print_json(&documents);
        }

        if documents.is_empty() {
            println!("No documents ingested yet.");
        }
        for document in &documents {
            println!(
                "{}  {}  {} pages  {}",
                document.id,
                document.name,
                document.page_count,
                document.created_at.format("%Y-%m-%d %H:%M:%S")
            );
        }

        Ok(())
    }
}
