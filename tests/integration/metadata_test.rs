//! Metadata Schema Integration Tests
//!
//! Verifies schema resolution from configuration and end-to-end metadata
//! acquisition from real files on disk: filename parsing, register lookup,
//! fallback text, and error handling for malformed names.

use metakb::models::settings::{AppConfig, KnowledgeBaseConfig, RegisterEntries};
use metakb::services::metadata::{research_register, SchemaRegistry, SENSITIVE_POINT_FALLBACK};
use metakb::utils::error::AppError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "sample content").unwrap();
    path
}

// ============================================================================
// Registry Resolution Tests
// ============================================================================

#[test]
fn test_builtin_registry_covers_default_config() {
    let registry = SchemaRegistry::builtin();
    for kb in &AppConfig::default().knowledge_bases {
        if kb.schema.is_some() {
            assert!(
                registry.contains(&kb.name),
                "No schema registered for default knowledge base '{}'",
                kb.name
            );
        }
    }
}

#[test]
fn test_from_config_rejects_unknown_schema() {
    let config = AppConfig {
        knowledge_bases: vec![KnowledgeBaseConfig {
            name: "broken".to_string(),
            description: String::new(),
            schema: Some("no_such_register".to_string()),
        }],
        ..Default::default()
    };

    let result = SchemaRegistry::from_config(&config);
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_untagged_knowledge_base_stays_unregistered() {
    let config = AppConfig {
        knowledge_bases: vec![KnowledgeBaseConfig {
            name: "plain".to_string(),
            description: String::new(),
            schema: None,
        }],
        ..Default::default()
    };

    let registry = SchemaRegistry::from_config(&config).unwrap();
    assert!(!registry.contains("plain"));
    assert!(registry.get("plain").is_none());
}

// ============================================================================
// Schema Acquisition Tests
// ============================================================================

#[test]
fn test_research_schema_tags_from_filename() {
    let dir = TempDir::new().unwrap();
    let path = touch(&dir, "formulation-topsecret1-3.txt");

    let registry = SchemaRegistry::builtin();
    let schema = registry.get("research_archive").unwrap();
    let metadata = schema
        .acquire("formulation-topsecret1-3.txt", &path)
        .unwrap();

    assert_eq!(metadata.doc_name, "formulation-topsecret1-3.txt");
    assert_eq!(metadata.doc_type.as_deref(), Some("formulation"));
    assert_eq!(metadata.level.as_deref(), Some("topsecret"));
    assert!(metadata
        .sensitive_points
        .as_deref()
        .unwrap()
        .contains("formulation sheets"));
    // Base fields are filled alongside the register lookup
    assert_eq!(metadata.doc_id.len(), 36);
    assert!(metadata.creation_date.is_some());
}

#[test]
fn test_casework_schema_tags_from_filename() {
    let dir = TempDir::new().unwrap();
    let path = touch(&dir, "bribery-classified7-1.txt");

    let registry = SchemaRegistry::builtin();
    let schema = registry.get("casework_archive").unwrap();
    let metadata = schema.acquire("bribery-classified7-1.txt", &path).unwrap();

    assert_eq!(metadata.doc_type.as_deref(), Some("bribery"));
    assert_eq!(metadata.level.as_deref(), Some("classified"));
    assert_eq!(
        metadata.sensitive_points.as_deref(),
        Some("Bribery allegations above the filing threshold")
    );
}

#[test]
fn test_unlisted_point_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = touch(&dir, "formulation-secret9-1.txt");

    let registry = SchemaRegistry::builtin();
    let schema = registry.get("research_archive").unwrap();
    let metadata = schema.acquire("formulation-secret9-1.txt", &path).unwrap();

    assert_eq!(
        metadata.sensitive_points.as_deref(),
        Some(SENSITIVE_POINT_FALLBACK)
    );
}

#[test]
fn test_malformed_name_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = touch(&dir, "plainname.txt");

    let registry = SchemaRegistry::builtin();
    let schema = registry.get("research_archive").unwrap();
    let result = schema.acquire("plainname.txt", &path);

    assert!(matches!(result, Err(AppError::Parse(_))));
}

#[test]
fn test_custom_register_from_config() {
    let dir = TempDir::new().unwrap();
    let path = touch(&dir, "pricing-internal1-2.txt");

    let mut register: RegisterEntries = HashMap::new();
    register.insert(
        "pricing".to_string(),
        HashMap::from([(
            "internal".to_string(),
            HashMap::from([(1u32, "Discount schedules".to_string())]),
        )]),
    );

    let config = AppConfig {
        knowledge_bases: vec![KnowledgeBaseConfig {
            name: "pricing_archive".to_string(),
            description: "Internal pricing samples".to_string(),
            schema: Some("pricing_register".to_string()),
        }],
        custom_registers: HashMap::from([("pricing_register".to_string(), register)]),
        ..Default::default()
    };

    let registry = SchemaRegistry::from_config(&config).unwrap();
    let schema = registry.get("pricing_archive").unwrap();
    let metadata = schema.acquire("pricing-internal1-2.txt", &path).unwrap();

    assert_eq!(
        metadata.sensitive_points.as_deref(),
        Some("Discount schedules")
    );
}

#[test]
fn test_builtin_registers_are_shared() {
    let first = research_register();
    let second = research_register();
    assert!(Arc::ptr_eq(&first, &second));
}
