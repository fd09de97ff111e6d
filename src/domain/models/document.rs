//! Knowledge document domain model.
//!
//! Three document families share one shape:
//! - Skill card: aggregated summary of one exam competency
//! - Distractor pattern: a named category of plausible-wrong-answer logic
//! - Similarity item: truncated historical item text for originality checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document family classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Aggregated competency summary, keyed by skill
    SkillCard,
    /// Named wrong-answer reasoning category with example rationales
    DistractorPattern,
    /// Truncated historical item snippet for duplicate checking
    SimilarityItem,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkillCard => "skill_card",
            Self::DistractorPattern => "distractor_pattern",
            Self::SimilarityItem => "similarity_item",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skill_card" => Some(Self::SkillCard),
            "distractor_pattern" => Some(Self::DistractorPattern),
            "similarity_item" => Some(Self::SimilarityItem),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A knowledge document in its insert shape: everything except the
/// store-assigned identity. Built by the aggregator, consumed by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub doc_type: DocType,
    pub exam: Option<String>,
    pub skill: Option<String>,
    pub topic: Option<String>,
    pub difficulty_band: Option<String>,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub source_file: Option<String>,
    pub embedding: Vec<f32>,
}

impl NewDocument {
    /// Start a document of the given type with the given content. Classifier
    /// fields default to unset; builder methods fill in what the doc_type
    /// requires.
    pub fn new(doc_type: DocType, content: impl Into<String>) -> Self {
        Self {
            doc_type,
            exam: None,
            skill: None,
            topic: None,
            difficulty_band: None,
            content: content.into(),
            metadata: None,
            source_file: None,
            embedding: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Validate the document invariants before insert.
    pub fn validate(&self) -> Result<(), String> {
        if self.content.is_empty() {
            return Err("document content cannot be empty".to_string());
        }
        if self.doc_type == DocType::SkillCard && self.skill.is_none() {
            return Err("skill_card documents must set a skill".to_string());
        }
        Ok(())
    }
}

/// A persisted knowledge document. Immutable once written; the only
/// permitted mutation is administrative deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: Uuid,
    pub doc_type: DocType,
    pub exam: Option<String>,
    pub skill: Option<String>,
    pub topic: Option<String>,
    pub difficulty_band: Option<String>,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// Listing shape: document headers with the content clipped to a short
/// snippet, to keep list payloads small.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub doc_type: DocType,
    pub skill: Option<String>,
    pub topic: Option<String>,
    pub difficulty_band: Option<String>,
    pub source_file: Option<String>,
    pub snippet: String,
}

/// Snippet length used in document listings.
pub const SNIPPET_LEN: usize = 200;

/// Clip `content` to at most `SNIPPET_LEN` characters, appending an ellipsis
/// when anything was cut.
pub fn snippet_of(content: &str) -> String {
    if content.chars().count() > SNIPPET_LEN {
        let clipped: String = content.chars().take(SNIPPET_LEN).collect();
        format!("{}...", clipped)
    } else {
        content.to_string()
    }
}

/// A group of documents sharing byte-identical content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Short content preview identifying the group
    pub preview: String,
    pub doc_type: DocType,
    pub count: usize,
    /// Ids in store order; duplicate cleanup keeps the first
    pub ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_round_trip() {
        for doc_type in [
            DocType::SkillCard,
            DocType::DistractorPattern,
            DocType::SimilarityItem,
        ] {
            assert_eq!(DocType::from_str(doc_type.as_str()), Some(doc_type));
        }
        assert_eq!(DocType::from_str("unknown"), None);
    }

    #[test]
    fn test_validate_rejects_empty_content() {
        let doc = NewDocument::new(DocType::SimilarityItem, "");
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_validate_requires_skill_on_skill_cards() {
        let doc = NewDocument::new(DocType::SkillCard, "Skill: Algebra");
        assert!(doc.validate().is_err());

        let doc = doc.with_skill("Algebra");
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_snippet_clips_long_content() {
        let long = "x".repeat(300);
        let snippet = snippet_of(&long);
        assert_eq!(snippet.chars().count(), SNIPPET_LEN + 3);
        assert!(snippet.ends_with("..."));

        let short = "short content";
        assert_eq!(snippet_of(short), short);
    }
}
