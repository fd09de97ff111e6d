use crate::domain::models::{
    DocType, DocumentSummary, DuplicateGroup, KnowledgeDocument, NewDocument,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for knowledge-document storage
///
/// Documents are immutable once written: there is no update operation, only
/// insert, query, and administrative deletion (duplicate cleanup).
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a single document and return its assigned id.
    ///
    /// # Errors
    /// Returns error if the document fails validation or the database
    /// operation fails.
    async fn insert(&self, doc: NewDocument) -> Result<Uuid>;

    /// Insert a batch of documents inside one transaction.
    ///
    /// Either every document becomes visible or none does; a failure part
    /// way through rolls the whole batch back.
    async fn insert_all(&self, docs: Vec<NewDocument>) -> Result<Vec<Uuid>>;

    /// Fetch documents of one type in store default order, optionally
    /// limited.
    async fn query_by_type(
        &self,
        doc_type: DocType,
        limit: Option<usize>,
    ) -> Result<Vec<KnowledgeDocument>>;

    /// Find the first skill-card document whose skill classifier contains
    /// the given substring, case-insensitively. Returns None on a miss.
    async fn find_skill_card(&self, skill: &str) -> Result<Option<KnowledgeDocument>>;

    /// List document headers with clipped content snippets, optionally
    /// filtered by type.
    async fn list(&self, doc_type: Option<DocType>) -> Result<Vec<DocumentSummary>>;

    /// Fetch one document by id.
    async fn get(&self, id: Uuid) -> Result<Option<KnowledgeDocument>>;

    /// Find groups of documents with byte-identical content (group size > 1),
    /// ids in store order.
    async fn find_duplicates(&self) -> Result<Vec<DuplicateGroup>>;

    /// Delete documents by id; returns how many rows were removed.
    async fn delete(&self, ids: &[Uuid]) -> Result<u64>;
}
