//! Domain errors for the itemforge knowledge-base system.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the itemforge system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Retrieval strategy not available: {0}")]
    RetrievalUnavailable(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
