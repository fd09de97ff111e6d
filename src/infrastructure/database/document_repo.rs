use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::models::{
    snippet_of, DocType, DocumentSummary, DuplicateGroup, KnowledgeDocument, NewDocument,
};
use crate::domain::ports::DocumentRepository;
use crate::infrastructure::database::utils::parse_datetime;

/// Length of the content preview used to label duplicate groups.
const DUPLICATE_PREVIEW_LEN: usize = 50;

/// SQLite implementation of DocumentRepository
///
/// Documents land in one `rag_documents` table, discriminated by doc_type.
/// The metadata and embedding columns hold JSON text. Store default order is
/// insertion order (rowid).
#[derive(Debug)]
pub struct DocumentRepositoryImpl {
    pool: SqlitePool,
}

type DocumentRow = (
    String,         // id
    String,         // doc_type
    Option<String>, // exam
    Option<String>, // skill
    Option<String>, // topic
    Option<String>, // difficulty_band
    String,         // content
    Option<String>, // metadata
    Option<String>, // source_file
    String,         // embedding
    String,         // created_at
);

const SELECT_COLUMNS: &str = "id, doc_type, exam, skill, topic, difficulty_band, \
                              content, metadata, source_file, embedding, created_at";

impl DocumentRepositoryImpl {
    /// Create a new DocumentRepositoryImpl
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_document(row: DocumentRow) -> Result<KnowledgeDocument> {
        let (
            id,
            doc_type,
            exam,
            skill,
            topic,
            difficulty_band,
            content,
            metadata,
            source_file,
            embedding,
            created_at,
        ) = row;

        Ok(KnowledgeDocument {
            id: id.parse().context("failed to parse document id")?,
            doc_type: DocType::from_str(&doc_type)
                .with_context(|| format!("unknown doc_type: {}", doc_type))?,
            exam,
            skill,
            topic,
            difficulty_band,
            content,
            metadata: metadata
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("failed to deserialize metadata")?,
            source_file,
            embedding: serde_json::from_str(&embedding)
                .context("failed to deserialize embedding")?,
            created_at: parse_datetime(&created_at).context("failed to parse created_at")?,
        })
    }

    async fn insert_in<'e, E>(executor: E, doc: &NewDocument) -> Result<Uuid>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        doc.validate().map_err(anyhow::Error::msg)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let doc_type_str = doc.doc_type.as_str();
        let metadata_json = doc
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to serialize metadata")?;
        let embedding_json =
            serde_json::to_string(&doc.embedding).context("failed to serialize embedding")?;
        let created_at_str = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO rag_documents (
                id, doc_type, exam, skill, topic, difficulty_band,
                content, metadata, source_file, embedding, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(doc_type_str)
        .bind(&doc.exam)
        .bind(&doc.skill)
        .bind(&doc.topic)
        .bind(&doc.difficulty_band)
        .bind(&doc.content)
        .bind(&metadata_json)
        .bind(&doc.source_file)
        .bind(&embedding_json)
        .bind(&created_at_str)
        .execute(executor)
        .await
        .context("failed to insert document")?;

        Ok(id)
    }
}

#[async_trait]
impl DocumentRepository for DocumentRepositoryImpl {
    async fn insert(&self, doc: NewDocument) -> Result<Uuid> {
        Self::insert_in(&self.pool, &doc).await
    }

    async fn insert_all(&self, docs: Vec<NewDocument>) -> Result<Vec<Uuid>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        let mut ids = Vec::with_capacity(docs.len());
        for doc in &docs {
            let id = Self::insert_in(&mut *tx, doc).await?;
            ids.push(id);
        }

        tx.commit().await.context("failed to commit transaction")?;
        Ok(ids)
    }

    async fn query_by_type(
        &self,
        doc_type: DocType,
        limit: Option<usize>,
    ) -> Result<Vec<KnowledgeDocument>> {
        // SQLite treats LIMIT -1 as unbounded.
        let limit_i64 = limit.map_or(-1, |n| n as i64);

        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM rag_documents
            WHERE doc_type = ?
            ORDER BY rowid
            LIMIT ?
            "#,
            SELECT_COLUMNS
        ))
        .bind(doc_type.as_str())
        .bind(limit_i64)
        .fetch_all(&self.pool)
        .await
        .context("failed to query documents by type")?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn find_skill_card(&self, skill: &str) -> Result<Option<KnowledgeDocument>> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM rag_documents
            WHERE doc_type = 'skill_card'
              AND skill IS NOT NULL
              AND lower(skill) LIKE '%' || lower(?) || '%'
            ORDER BY rowid
            LIMIT 1
            "#,
            SELECT_COLUMNS
        ))
        .bind(skill)
        .fetch_optional(&self.pool)
        .await
        .context("failed to query skill card")?;

        row.map(Self::row_to_document).transpose()
    }

    async fn list(&self, doc_type: Option<DocType>) -> Result<Vec<DocumentSummary>> {
        let rows: Vec<DocumentRow> = if let Some(doc_type) = doc_type {
            sqlx::query_as(&format!(
                "SELECT {} FROM rag_documents WHERE doc_type = ? ORDER BY rowid",
                SELECT_COLUMNS
            ))
            .bind(doc_type.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as(&format!(
                "SELECT {} FROM rag_documents ORDER BY rowid",
                SELECT_COLUMNS
            ))
            .fetch_all(&self.pool)
            .await
        }
        .context("failed to list documents")?;

        rows.into_iter()
            .map(|row| {
                let doc = Self::row_to_document(row)?;
                Ok(DocumentSummary {
                    id: doc.id,
                    doc_type: doc.doc_type,
                    skill: doc.skill,
                    topic: doc.topic,
                    difficulty_band: doc.difficulty_band,
                    source_file: doc.source_file,
                    snippet: snippet_of(&doc.content),
                })
            })
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<KnowledgeDocument>> {
        let id_str = id.to_string();
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM rag_documents WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(&id_str)
        .fetch_optional(&self.pool)
        .await
        .context("failed to query document")?;

        row.map(Self::row_to_document).transpose()
    }

    async fn find_duplicates(&self) -> Result<Vec<DuplicateGroup>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT id, doc_type, content FROM rag_documents ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to scan documents for duplicates")?;

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, (DocType, Vec<Uuid>)> = HashMap::new();

        for (id, doc_type, content) in rows {
            let id: Uuid = id.parse().context("failed to parse document id")?;
            let doc_type = DocType::from_str(&doc_type)
                .with_context(|| format!("unknown doc_type: {}", doc_type))?;
            if !groups.contains_key(&content) {
                order.push(content.clone());
            }
            groups.entry(content).or_insert((doc_type, Vec::new())).1.push(id);
        }

        Ok(order
            .into_iter()
            .filter_map(|content| {
                let (doc_type, ids) = groups.remove(&content)?;
                if ids.len() < 2 {
                    return None;
                }
                let preview: String = content.chars().take(DUPLICATE_PREVIEW_LEN).collect();
                Some(DuplicateGroup {
                    preview: format!("{}...", preview),
                    doc_type,
                    count: ids.len(),
                    ids,
                })
            })
            .collect())
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM rag_documents WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }

        let result = query
            .execute(&self.pool)
            .await
            .context("failed to delete documents")?;

        Ok(result.rows_affected())
    }
}
