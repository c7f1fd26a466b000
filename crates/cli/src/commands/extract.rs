//! Extract command handler.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppResult};
use clauseiq_engine::{DocumentId, FieldName};

/// Show the extracted fields of a document
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Document id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExtractCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing extract command for document '{}'", self.id);

        let engine = open_engine(config)?;
        let record = engine.extract(&DocumentId::new(self.id.as_str()))?;

        if self.json {
            return print_json(&record);
        }

        for field in FieldName::ALL {
            let values = record.values(field);
            if values.is_empty() {
                println!("{:<16} -", field.as_str());
                continue;
            }
            for (i, extracted) in values.iter().enumerate() {
                let label = if i == 0 { field.as_str() } else { "" };
                println!(
                    "{:<16} {}  [passage {}]",
                    label, extracted.value, extracted.passage
                );
            }
        }

        Ok(())
    }
}
