//! Metadata Services
//!
//! Metadata tagging for ingested documents: the record model, filename
//! parsing, lookup tables, schemas, and the per-knowledge-base registry.

pub mod filename;
pub mod model;
pub mod registry;
pub mod schema;
pub mod tables;

pub use model::DocumentMetadata;
pub use registry::{resolve_schema, SchemaRegistry};
pub use schema::{base_metadata, profile_schema, sensitive_point_schema, MetadataSchema};
pub use tables::{
    casework_register, critical_profile, ordinary_profile, research_register, ProfileTable,
    SensitivePointTable, SENSITIVE_POINT_FALLBACK,
};
