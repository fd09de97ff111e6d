//! CLI command implementations.

pub mod documents;
pub mod generate;
pub mod ingest;
pub mod init;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::database::{DatabaseConnection, DocumentRepositoryImpl};

/// Open the configured database, creating its parent directory and applying
/// migrations.
pub(crate) async fn open_database(config: &Config) -> Result<DatabaseConnection> {
    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let url = format!("sqlite:{}", config.database.path);
    let db = DatabaseConnection::new(&url, config.database.max_connections)
        .await
        .context("failed to open database")?;
    db.migrate().await?;
    Ok(db)
}

/// Build the document repository on the given connection.
pub(crate) fn build_repository(db: &DatabaseConnection) -> Arc<DocumentRepositoryImpl> {
    Arc::new(DocumentRepositoryImpl::new(db.pool().clone()))
}
