use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::application::CorpusAggregator;
use crate::domain::ports::MockEmbeddingProvider;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::corpus;

#[derive(Args)]
pub struct IngestArgs {
    /// Path to the corpus CSV file
    pub file: PathBuf,

    /// Source label recorded on the created documents (defaults to the file name)
    #[arg(long)]
    pub source_name: Option<String>,
}

/// Run the ETL aggregation pipeline over a corpus file.
pub async fn execute(args: IngestArgs, json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    let records = corpus::read_records(&args.file).context("failed to read corpus")?;

    let source_label = args.source_name.unwrap_or_else(|| {
        args.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.file.display().to_string())
    });

    let db = super::open_database(&config).await?;
    let repository = super::build_repository(&db);
    let embedder = Arc::new(MockEmbeddingProvider::new(config.embedding.dimension));

    let aggregator = CorpusAggregator::new(repository, embedder);
    let summary = aggregator.aggregate(&records, &source_label).await?;

    db.close().await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "details": summary,
            })
        );
    } else {
        println!("Ingested {} rows from {}", summary.rows_processed, source_label);
        println!("  skill cards:      {}", summary.skill_cards_created);
        println!("  distractor sets:  {}", summary.patterns_created);
        println!("  similarity items: {}", summary.similarity_items_created);
    }

    Ok(())
}
