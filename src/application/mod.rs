//! Application layer: use-case services built on the domain ports.
//!
//! - `CorpusAggregator`: raw corpus rows into knowledge documents
//! - `LexicalRetriever`: grounding context for generation requests
//! - `ItemGenerator`: prompt assembly, completion invocation, and recovery

pub mod aggregator;
pub mod generator;
pub mod retriever;

pub use aggregator::{AggregateSummary, CorpusAggregator};
pub use generator::{ItemGenerator, ItemPrompt};
pub use retriever::{LexicalRetriever, RetrievedContext, Retriever};
