//! Domain models for the itemforge knowledge-base system.

pub mod config;
pub mod document;
pub mod item;
pub mod record;

pub use config::{
    Config, DatabaseConfig, EmbeddingConfig, GenerationConfig, LoggingConfig, RetrievalConfig,
    RetrievalStrategy, RetryConfig,
};
pub use document::{
    snippet_of, DocType, DocumentSummary, DuplicateGroup, KnowledgeDocument, NewDocument,
    SNIPPET_LEN,
};
pub use item::{
    DebugInfo, FallbackItem, GeneratedItem, GenerationOutcome, OPTION_LABELS,
};
pub use record::{RawRecord, DISTRACTOR_SLOTS};
