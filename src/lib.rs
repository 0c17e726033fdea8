//! MetaKB - Metadata-Tagged Knowledge Base Library
//!
//! Backend library for metadata-driven document retrieval. It includes:
//! - Metadata schemas that tag documents from their file names at ingestion
//! - A SQLite knowledge store with FTS5 full-text search
//! - A retriever service and prompt-context formatting
//! - A search tool exposed through the core tool registry

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use models::settings::{AppConfig, KnowledgeBaseConfig, SearchToolConfig, SettingsUpdate};
pub use services::knowledge::{
    format_context_block, FtsRetriever, IngestPipeline, IngestReport, KnowledgeStore,
    RetrievedDocument, RetrieverService, StoredDocument,
};
pub use services::metadata::{DocumentMetadata, MetadataSchema, SchemaRegistry};
pub use services::tools::{default_registry, SearchKnowledgeTool};
pub use storage::config::ConfigService;
pub use storage::database::Database;
pub use utils::error::{AppError, AppResult};
