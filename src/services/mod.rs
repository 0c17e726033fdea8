//! Services
//!
//! Business logic services for the application: metadata schemas, knowledge
//! storage and retrieval, and the tools that expose them.

pub mod knowledge;
pub mod metadata;
pub mod tools;

pub use knowledge::{FtsRetriever, IngestPipeline, KnowledgeStore, RetrieverService};
pub use metadata::{MetadataSchema, SchemaRegistry};
pub use tools::SearchKnowledgeTool;
