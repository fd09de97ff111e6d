use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::output::{format_documents_table, format_duplicates_table};
use crate::domain::models::DocType;
use crate::domain::ports::DocumentRepository;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    pub command: DocumentsCommands,
}

#[derive(Subcommand)]
pub enum DocumentsCommands {
    /// List documents with content snippets
    List {
        /// Filter by document type (skill_card, distractor_pattern, similarity_item)
        #[arg(long)]
        doc_type: Option<String>,
    },
    /// Show one document in full
    Show {
        /// Document id
        id: Uuid,
    },
    /// Report groups of documents with identical content
    Duplicates,
    /// Delete duplicates, keeping one document per content group
    Clean,
}

pub async fn execute(args: DocumentsArgs, json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let db = super::open_database(&config).await?;
    let repository = super::build_repository(&db);

    let result = match args.command {
        DocumentsCommands::List { doc_type } => {
            let doc_type = doc_type
                .map(|s| {
                    DocType::from_str(&s)
                        .with_context(|| format!("unknown document type: {}", s))
                })
                .transpose()?;

            let documents = repository.list(doc_type).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else if documents.is_empty() {
                println!("No documents found.");
            } else {
                println!("{}", format_documents_table(&documents));
                println!("\n{} document(s)", documents.len());
            }
            Ok(())
        }
        DocumentsCommands::Show { id } => {
            let document = repository
                .get(id)
                .await?
                .with_context(|| format!("document not found: {}", id))?;
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        DocumentsCommands::Duplicates => {
            let groups = repository.find_duplicates().await?;
            let total: usize = groups.iter().map(|g| g.count).sum();
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "duplicate_groups": groups.len(),
                        "total_duplicate_items": total,
                        "details": groups,
                    })
                );
            } else if groups.is_empty() {
                println!("No duplicates found.");
            } else {
                println!("{}", format_duplicates_table(&groups));
                println!("\n{} group(s), {} document(s) involved", groups.len(), total);
            }
            Ok(())
        }
        DocumentsCommands::Clean => {
            let groups = repository.find_duplicates().await?;
            // Keep the first document of each group, delete the rest.
            let to_delete: Vec<Uuid> = groups
                .iter()
                .flat_map(|group| group.ids.iter().skip(1).copied())
                .collect();

            let deleted = repository.delete(&to_delete).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "deleted_count": deleted,
                        "message": format!("Cleaned {} duplicate documents.", deleted),
                    })
                );
            } else if deleted == 0 {
                println!("No duplicates found.");
            } else {
                println!("Cleaned {} duplicate document(s).", deleted);
            }
            Ok(())
        }
    };

    db.close().await;
    result
}
