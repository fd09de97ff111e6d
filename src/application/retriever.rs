//! Retrieval of grounding context for item generation.
//!
//! The retriever is a pluggable seam: the lexical implementation ships as
//! the default, and a vector-similarity variant can slot in behind the same
//! trait once real embeddings exist. Selection happens in configuration,
//! not at call sites.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::errors::DomainError;
use crate::domain::models::{DocType, RetrievalConfig, RetrievalStrategy};
use crate::domain::ports::DocumentRepository;

/// Context retrieved to ground one generation request.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    /// Skill-card content, or a deterministic placeholder on a miss
    pub skill_card: String,
    /// Concatenated distractor-pattern contents, newline separated
    pub distractor_guidance: String,
}

/// Trait for retrieval strategies.
///
/// `exam` and `topic` are part of the contract for forward-compatible
/// filtering; the lexical implementation does not yet filter by them.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        exam: &str,
        skill: &str,
        topic: Option<&str>,
    ) -> Result<RetrievedContext>;
}

/// Lexical retriever: case-insensitive substring match on the skill
/// classifier, plus the first few distractor patterns in store order.
#[derive(Debug)]
pub struct LexicalRetriever<S: DocumentRepository> {
    store: Arc<S>,
    max_distractor_patterns: usize,
}

impl<S: DocumentRepository> LexicalRetriever<S> {
    pub fn new(store: Arc<S>, max_distractor_patterns: usize) -> Self {
        Self {
            store,
            max_distractor_patterns,
        }
    }

    /// Build the retriever selected by configuration.
    ///
    /// The `vector` strategy is reserved until a semantic embedding provider
    /// exists; selecting it is an error rather than a silent downgrade.
    pub fn from_config(store: Arc<S>, config: &RetrievalConfig) -> Result<Self> {
        match config.strategy {
            RetrievalStrategy::Lexical => {
                Ok(Self::new(store, config.max_distractor_patterns))
            }
            RetrievalStrategy::Vector => Err(DomainError::RetrievalUnavailable(
                "vector retrieval requires a semantic embedding provider; use lexical".to_string(),
            )
            .into()),
        }
    }
}

#[async_trait]
impl<S: DocumentRepository> Retriever for LexicalRetriever<S> {
    #[instrument(skip(self), fields(exam = exam, skill = skill))]
    async fn retrieve(
        &self,
        exam: &str,
        skill: &str,
        _topic: Option<&str>,
    ) -> Result<RetrievedContext> {
        // exam and topic are accepted but not yet used as filters.
        let skill_card = self
            .store
            .find_skill_card(skill)
            .await
            .context("failed to query skill card")?;

        let skill_card = match skill_card {
            Some(doc) => doc.content,
            None => {
                debug!(skill = skill, "no skill card matched; using placeholder");
                format!("Skill {} not found.", skill)
            }
        };

        let distractors = self
            .store
            .query_by_type(DocType::DistractorPattern, Some(self.max_distractor_patterns))
            .await
            .context("failed to query distractor patterns")?;

        let distractor_guidance = distractors
            .into_iter()
            .map(|doc| doc.content)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(RetrievedContext {
            skill_card,
            distractor_guidance,
        })
    }
}
