//! ClauseIQ CLI
//!
//! Main entry point for the clauseiq command-line tool.
//! Ingests contracts, extracts key fields, answers questions with cited
//! passages and audits contracts for risky terms.

mod commands;

use clap::{Parser, Subcommand};
use clauseiq_core::{config::AppConfig, logging, AppResult};
use commands::{
    AskCommand, AuditCommand, DocumentsCommand, ExtractCommand, IngestCommand, StatsCommand,
};
use std::path::PathBuf;

/// ClauseIQ - contract intelligence from the command line
#[derive(Parser, Debug)]
#[command(name = "clauseiq")]
#[command(about = "Contract field extraction, question answering and risk audit", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "CLAUSEIQ_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "CLAUSEIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest contract files or directories
    Ingest(IngestCommand),

    /// Show the extracted fields of a document
    Extract(ExtractCommand),

    /// Ask a question about a document
    Ask(AskCommand),

    /// Audit a document for risky terms
    Audit(AuditCommand),

    /// List ingested documents
    Documents(DocumentsCommand),

    /// Show totals over all documents
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("ClauseIQ CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Store: {:?}", config.resolved_store_path());

    config.validate()?;
    config.ensure_state_dir()?;

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Extract(_) => "extract",
        Commands::Ask(_) => "ask",
        Commands::Audit(_) => "audit",
        Commands::Documents(_) => "documents",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Extract(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Audit(cmd) => cmd.execute(&config).await,
        Commands::Documents(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
