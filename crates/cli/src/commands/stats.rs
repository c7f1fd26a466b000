//! Stats command handler.
//!
//! Shows totals over every stored document.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppResult};

/// Show totals over all documents
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let engine = open_engine(config)?;
        let stats = engine.stats()?;

        if self.json {
            return print_json(&stats);
        }

        println!("Documents:     {}", stats.documents);
        println!("Pages:         {}", stats.pages);
        println!("Passages:      {}", stats.passages);
        println!("Indexed terms: {}", stats.indexed_terms);
        println!("Fields set:    {}", stats.fields_set);

        Ok(())
    }
}
