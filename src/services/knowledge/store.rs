//! Knowledge Store
//!
//! SQLite persistence for knowledge bases and their documents, with an FTS5
//! shadow table for bm25-ranked full-text search. Ranking is delegated
//! entirely to SQLite's FTS engine; this module never scores content itself.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::metadata::model::DocumentMetadata;
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Metadata for a knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Unique knowledge base ID.
    pub id: String,
    /// Unique human-readable name.
    pub name: String,
    /// Description of what this knowledge base contains.
    pub description: String,
    /// Metadata schema name, if documents are tagged at ingestion.
    pub schema_name: Option<String>,
    /// Number of documents stored.
    pub doc_count: i64,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// A stored document with its metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Unique document row ID.
    pub id: String,
    /// Document file name.
    pub doc_name: String,
    /// Full text content.
    pub content: String,
    /// Metadata record built at ingestion time.
    pub metadata: DocumentMetadata,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A raw full-text hit: the document plus its bm25 rank.
///
/// SQLite returns bm25 ranks negative (better matches are more negative).
/// Normalization to 0..1 happens in the retriever.
#[derive(Debug, Clone)]
pub struct RawSearchHit {
    pub document: StoredDocument,
    pub bm25: f64,
}

// ---------------------------------------------------------------------------
// KnowledgeStore
// ---------------------------------------------------------------------------

/// Store for knowledge bases and documents backed by pooled SQLite.
#[derive(Clone)]
pub struct KnowledgeStore {
    database: Arc<Database>,
}

impl KnowledgeStore {
    /// Create a store, initializing its tables if needed.
    pub fn new(database: Arc<Database>) -> AppResult<Self> {
        let store = Self { database };
        store.init_schema()?;
        Ok(store)
    }

    fn kb_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<KnowledgeBase> {
        Ok(KnowledgeBase {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            schema_name: row.get(3)?,
            doc_count: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn document_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredDocument> {
        Ok(StoredDocument {
            id: row.get(0)?,
            doc_name: row.get(1)?,
            content: row.get(2)?,
            metadata: serde_json::from_str(&row.get::<_, String>(3)?).unwrap_or_default(),
            created_at: row.get(4)?,
        })
    }

    /// Initialize knowledge tables in SQLite.
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.database.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS knowledge_bases (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                schema_name TEXT,
                doc_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT DEFAULT (datetime('now')),
                updated_at TEXT DEFAULT (datetime('now'))
            )",
            [],
        )
        .map_err(|e| AppError::database(format!("Failed to create knowledge_bases: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                kb_id TEXT NOT NULL,
                doc_name TEXT NOT NULL,
                content TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                created_at TEXT DEFAULT (datetime('now')),
                UNIQUE(kb_id, doc_name),
                FOREIGN KEY (kb_id) REFERENCES knowledge_bases(id) ON DELETE CASCADE
            )",
            [],
        )
        .map_err(|e| AppError::database(format!("Failed to create documents: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_kb ON documents(kb_id)",
            [],
        )
        .map_err(|e| AppError::database(format!("Failed to create index: {}", e)))?;

        // FTS5 virtual table for full-text search with bm25 ranking
        conn.execute(
            "CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
                id UNINDEXED,
                content,
                tokenize='unicode61'
            )",
            [],
        )
        .map_err(|e| AppError::database(format!("Failed to create documents_fts: {}", e)))?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Knowledge bases
    // -----------------------------------------------------------------------

    /// Get or create a knowledge base by name.
    ///
    /// An existing knowledge base is returned as-is; description and schema
    /// are only written on first creation.
    pub fn create_knowledge_base(
        &self,
        name: &str,
        description: &str,
        schema_name: Option<&str>,
    ) -> AppResult<KnowledgeBase> {
        let conn = self.database.get_connection()?;

        let existing = conn
            .query_row(
                "SELECT id, name, description, schema_name, doc_count, created_at, updated_at
                 FROM knowledge_bases WHERE name = ?1",
                rusqlite::params![name],
                Self::kb_from_row,
            )
            .ok();
        if let Some(kb) = existing {
            return Ok(kb);
        }

        let id = uuid::Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO knowledge_bases (id, name, description, schema_name)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, name, description, schema_name],
        )
        .map_err(|e| AppError::database(format!("Failed to create knowledge base: {}", e)))?;

        tracing::info!(kb = %name, schema = ?schema_name, "Created knowledge base");

        conn.query_row(
            "SELECT id, name, description, schema_name, doc_count, created_at, updated_at
             FROM knowledge_bases WHERE name = ?1",
            rusqlite::params![name],
            Self::kb_from_row,
        )
        .map_err(|e| AppError::database(format!("Failed to load knowledge base: {}", e)))
    }

    /// Get a knowledge base by name.
    pub fn get_knowledge_base(&self, name: &str) -> AppResult<KnowledgeBase> {
        let conn = self.database.get_connection()?;
        conn.query_row(
            "SELECT id, name, description, schema_name, doc_count, created_at, updated_at
             FROM knowledge_bases WHERE name = ?1",
            rusqlite::params![name],
            Self::kb_from_row,
        )
        .map_err(|_| AppError::not_found(format!("Knowledge base '{}' not found", name)))
    }

    /// List all knowledge bases ordered by name.
    pub fn list_knowledge_bases(&self) -> AppResult<Vec<KnowledgeBase>> {
        let conn = self.database.get_connection()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, name, description, schema_name, doc_count, created_at, updated_at
                 FROM knowledge_bases ORDER BY name",
            )
            .map_err(|e| AppError::database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], Self::kb_from_row)
            .map_err(|e| AppError::database(format!("Failed to query knowledge bases: {}", e)))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Delete a knowledge base and all its documents.
    pub fn delete_knowledge_base(&self, name: &str) -> AppResult<()> {
        let kb = self.get_knowledge_base(name)?;
        let conn = self.database.get_connection()?;

        conn.execute(
            "DELETE FROM documents_fts WHERE id IN (SELECT id FROM documents WHERE kb_id = ?1)",
            rusqlite::params![kb.id],
        )
        .map_err(|e| AppError::database(format!("Failed to delete document index: {}", e)))?;

        conn.execute(
            "DELETE FROM documents WHERE kb_id = ?1",
            rusqlite::params![kb.id],
        )
        .map_err(|e| AppError::database(format!("Failed to delete documents: {}", e)))?;

        conn.execute(
            "DELETE FROM knowledge_bases WHERE id = ?1",
            rusqlite::params![kb.id],
        )
        .map_err(|e| AppError::database(format!("Failed to delete knowledge base: {}", e)))?;

        tracing::info!(kb = %name, "Deleted knowledge base");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Content hash of a stored document, or None if not stored.
    pub fn document_hash(&self, kb_name: &str, doc_name: &str) -> AppResult<Option<String>> {
        let kb = self.get_knowledge_base(kb_name)?;
        let conn = self.database.get_connection()?;

        let hash: Option<String> = conn
            .query_row(
                "SELECT content_hash FROM documents WHERE kb_id = ?1 AND doc_name = ?2",
                rusqlite::params![kb.id, doc_name],
                |row| row.get(0),
            )
            .ok();

        Ok(hash)
    }

    /// Insert or replace a document and keep the FTS index in sync.
    pub fn upsert_document(
        &self,
        kb_name: &str,
        doc_name: &str,
        content: &str,
        content_hash: &str,
        metadata: &DocumentMetadata,
    ) -> AppResult<StoredDocument> {
        let kb = self.get_knowledge_base(kb_name)?;
        let conn = self.database.get_connection()?;

        let metadata_json = serde_json::to_string(metadata)?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM documents WHERE kb_id = ?1 AND doc_name = ?2",
                rusqlite::params![kb.id, doc_name],
                |row| row.get(0),
            )
            .ok();

        let doc_id = match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE documents SET content = ?1, content_hash = ?2, metadata = ?3
                     WHERE id = ?4",
                    rusqlite::params![content, content_hash, metadata_json, id],
                )
                .map_err(|e| AppError::database(format!("Failed to update document: {}", e)))?;
                id
            }
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                conn.execute(
                    "INSERT INTO documents (id, kb_id, doc_name, content, content_hash, metadata)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![id, kb.id, doc_name, content, content_hash, metadata_json],
                )
                .map_err(|e| AppError::database(format!("Failed to insert document: {}", e)))?;
                id
            }
        };

        // FTS5 has no uniqueness on UNINDEXED columns, so replace manually
        conn.execute(
            "DELETE FROM documents_fts WHERE id = ?1",
            rusqlite::params![doc_id],
        )
        .map_err(|e| AppError::database(format!("Failed to clear document index: {}", e)))?;
        conn.execute(
            "INSERT INTO documents_fts (id, content) VALUES (?1, ?2)",
            rusqlite::params![doc_id, content],
        )
        .map_err(|e| AppError::database(format!("Failed to index document: {}", e)))?;

        // Refresh document count
        let doc_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE kb_id = ?1",
                rusqlite::params![kb.id],
                |row| row.get(0),
            )
            .unwrap_or(0);

        conn.execute(
            "UPDATE knowledge_bases SET doc_count = ?1, updated_at = datetime('now') WHERE id = ?2",
            rusqlite::params![doc_count, kb.id],
        )
        .map_err(|e| AppError::database(format!("Failed to update knowledge base: {}", e)))?;

        tracing::debug!(kb = %kb_name, doc = %doc_name, "Stored document");

        conn.query_row(
            "SELECT id, doc_name, content, metadata, created_at
             FROM documents WHERE id = ?1",
            rusqlite::params![doc_id],
            Self::document_from_row,
        )
        .map_err(|e| AppError::database(format!("Failed to load document: {}", e)))
    }

    /// Get a document by knowledge base and name.
    pub fn get_document(&self, kb_name: &str, doc_name: &str) -> AppResult<StoredDocument> {
        let kb = self.get_knowledge_base(kb_name)?;
        let conn = self.database.get_connection()?;

        conn.query_row(
            "SELECT id, doc_name, content, metadata, created_at
             FROM documents WHERE kb_id = ?1 AND doc_name = ?2",
            rusqlite::params![kb.id, doc_name],
            Self::document_from_row,
        )
        .map_err(|_| {
            AppError::not_found(format!(
                "Document '{}' not found in knowledge base '{}'",
                doc_name, kb_name
            ))
        })
    }

    /// List documents in a knowledge base ordered by name.
    pub fn list_documents(&self, kb_name: &str) -> AppResult<Vec<StoredDocument>> {
        let kb = self.get_knowledge_base(kb_name)?;
        let conn = self.database.get_connection()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, doc_name, content, metadata, created_at
                 FROM documents WHERE kb_id = ?1 ORDER BY doc_name",
            )
            .map_err(|e| AppError::database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![kb.id], Self::document_from_row)
            .map_err(|e| AppError::database(format!("Failed to query documents: {}", e)))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Run a bm25-ranked full-text search scoped to one knowledge base.
    ///
    /// `match_query` must already be a valid FTS5 MATCH expression; callers
    /// sanitize user input first. Results come back best-first (ascending
    /// bm25, since ranks are negative).
    pub fn search_documents(
        &self,
        kb_name: &str,
        match_query: &str,
        limit: usize,
    ) -> AppResult<Vec<RawSearchHit>> {
        let kb = self.get_knowledge_base(kb_name)?;
        let conn = self.database.get_connection()?;

        let mut stmt = conn
            .prepare(
                "SELECT d.id, d.doc_name, d.content, d.metadata, d.created_at,
                        bm25(documents_fts) AS score
                 FROM documents_fts f
                 JOIN documents d ON d.id = f.id
                 WHERE documents_fts MATCH ?1 AND d.kb_id = ?2
                 ORDER BY score
                 LIMIT ?3",
            )
            .map_err(|e| AppError::database(format!("Failed to prepare search: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![match_query, kb.id, limit as i64], |row| {
                Ok(RawSearchHit {
                    document: Self::document_from_row(row)?,
                    bm25: row.get(5)?,
                })
            })
            .map_err(|e| AppError::database(format!("Failed to run search: {}", e)))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
