//! Knowledge Services
//!
//! Storage, ingestion, retrieval, and context formatting for metadata-tagged
//! knowledge bases:
//! - `store`: SQLite-backed knowledge bases, documents, and the FTS5 index
//! - `ingest`: directory walker that tags and writes documents
//! - `retriever`: search seam over the FTS engine with score normalization
//! - `context`: prompt-ready rendering of retrieved documents

pub mod context;
pub mod ingest;
pub mod retriever;
pub mod store;

pub use context::{format_context_block, format_metadata_block, NO_RESULTS_MESSAGE};
pub use ingest::{IngestOutcome, IngestPipeline, IngestReport, DOC_EXTENSIONS};
pub use retriever::{FtsRetriever, RetrievedDocument, RetrieverService};
pub use store::{KnowledgeBase, KnowledgeStore, RawSearchHit, StoredDocument};
