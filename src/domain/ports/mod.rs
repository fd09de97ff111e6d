//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters
//! must implement:
//! - DocumentRepository: knowledge-document store operations
//! - EmbeddingProvider: text-to-vector mapping (mock implementation ships)
//! - CompletionClient: LLM completion operations
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod completion;
pub mod document_repository;
pub mod embedding;
pub mod mock_embedding;

pub use completion::CompletionClient;
pub use document_repository::DocumentRepository;
pub use embedding::EmbeddingProvider;
pub use mock_embedding::MockEmbeddingProvider;
