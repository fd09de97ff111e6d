//! Itemforge - Pedagogical Knowledge-Base Builder and Item Generator
//!
//! Itemforge ingests a tabular corpus of historical exam questions, distills
//! it into reusable knowledge documents (skill cards, distractor-pattern
//! catalogs, and a similarity corpus), and uses lexical retrieval over those
//! documents to ground an LLM-driven generation step that produces new
//! multiple-choice exam items.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models and port traits
//! - **Application Layer** (`application`): Aggregation, retrieval, and
//!   generation use cases
//! - **Infrastructure Layer** (`infrastructure`): SQLite store, completions
//!   HTTP client, CSV reader, configuration
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use itemforge::application::CorpusAggregator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Ingest a corpus and generate items
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::{
    AggregateSummary, CorpusAggregator, ItemGenerator, ItemPrompt, LexicalRetriever,
    RetrievedContext, Retriever,
};
pub use domain::models::{
    Config, DocType, DocumentSummary, DuplicateGroup, FallbackItem, GeneratedItem,
    GenerationOutcome, KnowledgeDocument, NewDocument, RawRecord,
};
pub use domain::ports::{
    CompletionClient, DocumentRepository, EmbeddingProvider, MockEmbeddingProvider,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
