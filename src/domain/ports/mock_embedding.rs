//! Mock embedding provider implementation.
//!
//! A stand-in for a real semantic model: returns uniform-random vectors of
//! the configured dimension. Satisfies the shape contract of
//! `EmbeddingProvider` and nothing more, which is all the current retrieval
//! path needs.

use async_trait::async_trait;
use rand::Rng;

use super::embedding::EmbeddingProvider;
use crate::domain::errors::DomainResult;

/// Default vector dimension, matching common embedding model output sizes.
pub const DEFAULT_DIMENSION: usize = 1536;

/// An embedding provider that returns random vectors of a fixed dimension.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, _text: &str) -> DomainResult<Vec<f32>> {
        let mut rng = rand::thread_rng();
        Ok((0..self.dimension).map(|_| rng.gen::<f32>()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_returns_configured_dimension() {
        let provider = MockEmbeddingProvider::new(8);
        let vector = provider.embed("any text").await.unwrap();
        assert_eq!(vector.len(), 8);
        assert_eq!(provider.dimension(), 8);
    }

    #[tokio::test]
    async fn test_default_dimension() {
        let provider = MockEmbeddingProvider::default();
        let vector = provider.embed("text").await.unwrap();
        assert_eq!(vector.len(), DEFAULT_DIMENSION);
    }
}
