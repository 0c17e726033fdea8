//! Ingest Pipeline
//!
//! Walks directories of plain-text documents, tags each file with metadata
//! from the knowledge base's registered schema, and writes the result into
//! the knowledge store. Unchanged files (by content hash) are skipped.

use ignore::WalkBuilder;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::services::knowledge::store::{KnowledgeStore, StoredDocument};
use crate::services::metadata::registry::SchemaRegistry;
use crate::services::metadata::schema::base_metadata;
use crate::utils::error::{AppError, AppResult};

/// File extensions treated as ingestable documents.
pub const DOC_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text"];

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Outcome of ingesting a single file.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Document was written (new or replaced).
    Ingested(StoredDocument),
    /// Content hash matched the stored copy; nothing written.
    Unchanged,
}

/// Summary of a directory ingest run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Documents written.
    pub ingested: usize,
    /// Files skipped because their content was unchanged.
    pub skipped: usize,
    /// Files that failed, with the error message for each.
    pub failed: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// IngestPipeline
// ---------------------------------------------------------------------------

/// Pipeline tying the schema registry to the knowledge store.
pub struct IngestPipeline {
    store: KnowledgeStore,
    registry: Arc<SchemaRegistry>,
}

impl IngestPipeline {
    pub fn new(store: KnowledgeStore, registry: Arc<SchemaRegistry>) -> Self {
        Self { store, registry }
    }

    /// Scan a directory tree for ingestable document files.
    ///
    /// Hidden files and gitignored paths are skipped. Results are sorted for
    /// stable ingest order.
    pub fn scan_doc_files(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(AppError::not_found(format!(
                "Directory not found: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(dir).hidden(true).git_ignore(true).build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().map_or(true, |ft| !ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| DOC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if matches {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Ingest a single file into a knowledge base.
    ///
    /// The file name (with extension) becomes the document name. If the
    /// knowledge base has a registered metadata schema the schema tags the
    /// document; otherwise only the base fields are recorded.
    pub fn ingest_file(&self, kb_name: &str, path: &Path) -> AppResult<IngestOutcome> {
        let doc_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();

        let content = std::fs::read_to_string(path)?;

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let content_hash = format!("{:x}", hasher.finalize());

        if let Some(stored) = self.store.document_hash(kb_name, &doc_name)? {
            if stored == content_hash {
                tracing::debug!(kb = %kb_name, doc = %doc_name, "Document unchanged, skipping");
                return Ok(IngestOutcome::Unchanged);
            }
        }

        let metadata = match self.registry.get(kb_name) {
            Some(schema) => schema.acquire(&doc_name, path)?,
            None => base_metadata(&doc_name, path)?,
        };

        let document = self
            .store
            .upsert_document(kb_name, &doc_name, &content, &content_hash, &metadata)?;

        tracing::info!(kb = %kb_name, doc = %doc_name, "Ingested document");
        Ok(IngestOutcome::Ingested(document))
    }

    /// Ingest every document file under a directory into a knowledge base.
    ///
    /// The knowledge base must already exist. Individual file failures are
    /// recorded in the report and do not abort the run.
    pub fn ingest_dir(&self, kb_name: &str, dir: &Path) -> AppResult<IngestReport> {
        self.store.get_knowledge_base(kb_name)?;

        let files = self.scan_doc_files(dir)?;
        let mut report = IngestReport::default();

        for path in files {
            match self.ingest_file(kb_name, &path) {
                Ok(IngestOutcome::Ingested(_)) => report.ingested += 1,
                Ok(IngestOutcome::Unchanged) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to ingest file");
                    report
                        .failed
                        .push((path.display().to_string(), e.to_string()));
                }
            }
        }

        tracing::info!(
            kb = %kb_name,
            ingested = report.ingested,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Directory ingest complete"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
