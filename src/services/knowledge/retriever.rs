//! Retriever Service
//!
//! Trait seam between the search tool and whatever engine answers queries.
//! The bundled implementation delegates to the knowledge store's FTS5 index
//! and normalizes SQLite's negative bm25 ranks into 0..1 relevance scores.

use serde::{Deserialize, Serialize};

use crate::models::settings::SearchToolConfig;
use crate::services::knowledge::store::KnowledgeStore;
use crate::services::metadata::model::DocumentMetadata;
use crate::utils::error::AppResult;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A retrieved document with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub doc_name: String,
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Relevance in 0..1, higher is better.
    pub score: f32,
}

// ---------------------------------------------------------------------------
// RetrieverService
// ---------------------------------------------------------------------------

/// Engine-agnostic retrieval interface.
///
/// Results come back best-first, already cut to the configured result count
/// and score threshold.
pub trait RetrieverService: Send + Sync {
    fn retrieve(&self, kb_name: &str, query: &str) -> AppResult<Vec<RetrievedDocument>>;
}

/// Retriever backed by the knowledge store's FTS5 index.
pub struct FtsRetriever {
    store: KnowledgeStore,
    top_k: usize,
    score_threshold: f32,
}

impl FtsRetriever {
    pub fn new(store: KnowledgeStore, top_k: usize, score_threshold: f32) -> Self {
        Self {
            store,
            top_k,
            score_threshold,
        }
    }

    pub fn from_config(store: KnowledgeStore, config: &SearchToolConfig) -> Self {
        Self::new(store, config.top_k, config.score_threshold)
    }

    /// Strip FTS5 query syntax from user input.
    ///
    /// Disallowed characters become spaces so hyphenated terms still match
    /// as separate words.
    fn sanitize_query(query: &str) -> String {
        let cleaned: String = query
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == '_' {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        cleaned.trim().to_string()
    }

    /// Map a bm25 rank onto 0..1, higher is better.
    fn normalize_score(bm25: f64) -> f32 {
        let magnitude = bm25.abs();
        (magnitude / (magnitude + 1.0)) as f32
    }
}

impl RetrieverService for FtsRetriever {
    fn retrieve(&self, kb_name: &str, query: &str) -> AppResult<Vec<RetrievedDocument>> {
        let clean = Self::sanitize_query(query);
        if clean.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.store.search_documents(kb_name, &clean, self.top_k)?;

        let mut results: Vec<RetrievedDocument> = hits
            .into_iter()
            .map(|hit| RetrievedDocument {
                id: hit.document.id,
                doc_name: hit.document.doc_name,
                content: hit.document.content,
                metadata: hit.document.metadata,
                score: Self::normalize_score(hit.bm25),
            })
            .filter(|doc| doc.score >= self.score_threshold)
            .collect();
        results.truncate(self.top_k);

        tracing::debug!(kb = %kb_name, query = %clean, results = results.len(), "Retrieved documents");
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
