//! Command handlers for the ClauseIQ CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod audit;
pub mod documents;
pub mod extract;
pub mod ingest;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use audit::AuditCommand;
pub use documents::DocumentsCommand;
pub use extract::ExtractCommand;
pub use ingest::IngestCommand;
pub use stats::StatsCommand;

use clauseiq_core::{config::AppConfig, AppResult};
use clauseiq_engine::{config::load_config, ContractEngine, SqliteStore};
use std::sync::Arc;

/// Open the workspace store and engine configuration.
pub fn open_engine(config: &AppConfig) -> AppResult<Arc<ContractEngine<SqliteStore>>> {
    let engine_config = load_config(&config.workspace)?;
    let store = SqliteStore::open(&config.resolved_store_path())?;
    Ok(Arc::new(ContractEngine::new(store, engine_config)))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
