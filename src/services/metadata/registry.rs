//! Schema Registry
//!
//! Maps knowledge base names to the metadata schema that tags their
//! documents. Knowledge bases without an entry still ingest; their
//! documents carry only the base metadata fields.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::settings::{AppConfig, RegisterEntries};
use crate::services::metadata::schema::{
    profile_schema, sensitive_point_schema, MetadataSchema,
};
use crate::services::metadata::tables::{
    casework_register, critical_profile, ordinary_profile, research_register,
    SensitivePointTable,
};
use crate::utils::error::{AppError, AppResult};

/// Resolve a schema name to an instance.
///
/// Built-in names are checked first; anything else must name a custom
/// register supplied through config.
pub fn resolve_schema(
    name: &str,
    custom_registers: &HashMap<String, RegisterEntries>,
) -> Option<Arc<dyn MetadataSchema>> {
    match name {
        "research_register" => Some(sensitive_point_schema(name, research_register())),
        "casework_register" => Some(sensitive_point_schema(name, casework_register())),
        "profile_personal" => Some(profile_schema(name, ordinary_profile())),
        "profile_business" => Some(profile_schema(name, critical_profile())),
        _ => custom_registers.get(name).map(|entries| {
            sensitive_point_schema(
                name,
                Arc::new(SensitivePointTable::new(name, entries.clone())),
            )
        }),
    }
}

/// Registry of knowledge base name -> metadata schema.
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<dyn MetadataSchema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Registry for the built-in knowledge bases.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(
            "research_archive",
            sensitive_point_schema("research_register", research_register()),
        );
        registry.insert(
            "research_archive_neg",
            sensitive_point_schema("research_register", research_register()),
        );
        registry.insert(
            "casework_archive",
            sensitive_point_schema("casework_register", casework_register()),
        );
        registry
    }

    /// Build the registry from config.
    ///
    /// Every knowledge base that names a schema must resolve; an unknown
    /// schema name is a config error. Knowledge bases without a schema are
    /// simply absent from the registry.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mut registry = Self::new();
        for kb in &config.knowledge_bases {
            if let Some(schema_name) = &kb.schema {
                let schema = resolve_schema(schema_name, &config.custom_registers)
                    .ok_or_else(|| {
                        AppError::config(format!(
                            "unknown metadata schema '{}' for knowledge base '{}'",
                            schema_name, kb.name
                        ))
                    })?;
                registry.insert(&kb.name, schema);
            }
        }
        Ok(registry)
    }

    /// Register a schema for a knowledge base. Replaces any existing entry.
    pub fn insert(&mut self, kb_name: impl Into<String>, schema: Arc<dyn MetadataSchema>) {
        self.schemas.insert(kb_name.into(), schema);
    }

    /// Look up the schema for a knowledge base.
    pub fn get(&self, kb_name: &str) -> Option<Arc<dyn MetadataSchema>> {
        self.schemas.get(kb_name).cloned()
    }

    /// Whether a knowledge base has a registered schema.
    pub fn contains(&self, kb_name: &str) -> bool {
        self.schemas.contains_key(kb_name)
    }

    /// Registered knowledge base names in sorted order.
    pub fn kb_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered knowledge bases.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
