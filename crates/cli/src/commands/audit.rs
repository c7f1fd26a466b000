//! Audit command handler.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppResult};
use clauseiq_engine::DocumentId;

/// Audit a document for risky terms
#[derive(Args, Debug)]
pub struct AuditCommand {
    /// Document id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AuditCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing audit command for document '{}'", self.id);

        let engine = open_engine(config)?;
        let findings = engine.audit(&DocumentId::new(self.id.as_str()))?;

        if self.json {
            return print_json(&findings);
        }

        if findings.is_empty() {
            println!("No findings.");
            return Ok(());
        }

        for finding in &findings {
            println!("[{}] {} ({})", finding.severity, finding.title, finding.rule);
            println!("    {}", finding.description);
            if let Some(evidence) = &finding.evidence {
                match finding.passage {
                    Some(passage) => println!("    passage {}: \"{}\"", passage, evidence),
                    None => println!("    \"{}\"", evidence),
                }
            }
        }

        Ok(())
    }
}
