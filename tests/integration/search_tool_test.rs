//! Search Tool Integration Tests
//!
//! Runs the search tool the way a model-facing caller would: list the
//! registry definitions, then execute with JSON arguments and read the
//! formatted context out of the response.

use metakb::services::knowledge::{FtsRetriever, IngestPipeline, KnowledgeStore, NO_RESULTS_MESSAGE};
use metakb::services::metadata::SchemaRegistry;
use metakb::services::tools::{default_registry, SEARCH_KNOWLEDGE_TOOL_NAME};
use metakb::storage::database::Database;
use metakb_core::error::CoreError;
use metakb_core::tool::ToolRegistry;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn seeded_registry() -> ToolRegistry {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("formulation-topsecret1-2.txt"),
        "Complete solvent ratios for the flagship extraction line.",
    )
    .unwrap();
    fs::write(
        dir.path().join("research-secret6-1.txt"),
        "Stability study readouts for the lead candidate.",
    )
    .unwrap();

    let database = Arc::new(Database::new_in_memory().unwrap());
    let store = KnowledgeStore::new(database).unwrap();
    store
        .create_knowledge_base(
            "research_archive",
            "Positive research trade-secret samples",
            Some("research_register"),
        )
        .unwrap();

    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));
    let report = pipeline.ingest_dir("research_archive", dir.path()).unwrap();
    assert_eq!(report.ingested, 2);

    let retriever = Arc::new(FtsRetriever::new(store.clone(), 3, 0.0));
    default_registry(store, retriever).unwrap()
}

// ============================================================================
// Definition Tests
// ============================================================================

#[test]
fn test_registry_exposes_search_tool() {
    let registry = seeded_registry();
    assert!(registry.contains(SEARCH_KNOWLEDGE_TOOL_NAME));

    let definitions = registry.definitions();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0]["name"], SEARCH_KNOWLEDGE_TOOL_NAME);

    let description = definitions[0]["description"].as_str().unwrap();
    assert!(description.contains("research_archive"));
    assert!(description.contains("Positive research trade-secret samples"));

    let schema = &definitions[0]["parameters"];
    assert_eq!(schema["required"], json!(["database", "query"]));
}

// ============================================================================
// Execution Tests
// ============================================================================

#[tokio::test]
async fn test_execute_returns_context_with_metadata() {
    let registry = seeded_registry();
    let result = registry
        .execute(
            SEARCH_KNOWLEDGE_TOOL_NAME,
            json!({"database": "research_archive", "query": "solvent extraction"}),
        )
        .await
        .unwrap();

    assert_eq!(result["knowledge_base"], "research_archive");
    assert!(!result["results"].as_array().unwrap().is_empty());

    let context = result["context"].as_str().unwrap();
    assert!(context.contains("### Source 1"));
    assert!(context.contains("Document Type: formulation"));
    assert!(context.contains("Level: topsecret"));
    assert!(context.contains("solvent ratios for the flagship"));
}

#[tokio::test]
async fn test_execute_no_match_returns_fallback_message() {
    let registry = seeded_registry();
    let result = registry
        .execute(
            SEARCH_KNOWLEDGE_TOOL_NAME,
            json!({"database": "research_archive", "query": "zzzzzz"}),
        )
        .await
        .unwrap();

    assert!(result["results"].as_array().unwrap().is_empty());
    assert_eq!(result["context"], NO_RESULTS_MESSAGE);
}

#[tokio::test]
async fn test_execute_unknown_database_fails() {
    let registry = seeded_registry();
    let err = registry
        .execute(
            SEARCH_KNOWLEDGE_TOOL_NAME,
            json!({"database": "no_such_base", "query": "anything"}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn test_execute_missing_arguments_fail() {
    let registry = seeded_registry();
    let err = registry
        .execute(SEARCH_KNOWLEDGE_TOOL_NAME, json!({"query": "anything"}))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn test_execute_unknown_tool_fails() {
    let registry = seeded_registry();
    let err = registry
        .execute("no_such_tool", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotFound(_)));
}
