//! Itemforge CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use itemforge::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => itemforge::cli::commands::init::execute(args, cli.json).await,
        Commands::Ingest(args) => itemforge::cli::commands::ingest::execute(args, cli.json).await,
        Commands::Generate(args) => {
            itemforge::cli::commands::generate::execute(args, cli.json).await
        }
        Commands::Documents(args) => {
            itemforge::cli::commands::documents::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        itemforge::cli::handle_error(err, cli.json);
    }
}
