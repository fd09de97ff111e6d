//! Command-line interface for itemforge.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// itemforge - pedagogical knowledge-base builder and exam item generator
#[derive(Parser)]
#[command(name = "itemforge", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project configuration and database
    Init(commands::init::InitArgs),
    /// Ingest a CSV corpus into the knowledge base
    Ingest(commands::ingest::IngestArgs),
    /// Generate multiple-choice exam items
    Generate(commands::generate::GenerateArgs),
    /// Inspect and administer knowledge documents
    Documents(commands::documents::DocumentsArgs),
}

/// Print a failure outcome and exit nonzero.
///
/// In JSON mode the caller receives the same structured failure shape the
/// core reports: a status/message pair.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let report = serde_json::json!({
            "status": "error",
            "message": format!("{:#}", err),
        });
        eprintln!("{}", report);
    } else {
        eprintln!("Error: {:#}", err);
    }
    std::process::exit(1);
}
