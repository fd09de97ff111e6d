//! Embedding provider port.
//!
//! Defines the trait for providers that map text to a fixed-length numeric
//! vector. The contract guarantees the dimension only; whether the values
//! carry semantic meaning is up to the implementation.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Trait for embedding providers.
///
/// Callers must not rely on embedding values for correctness, only on the
/// vector shape: `embed` always returns exactly `dimension()` floats.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "mock").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>>;
}
