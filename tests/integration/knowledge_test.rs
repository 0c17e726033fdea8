//! Knowledge Ingest and Search Integration Tests
//!
//! Exercises the full pipeline: scan a directory, tag documents through the
//! schema registry, persist to SQLite, then search the FTS index through the
//! retriever service.

use metakb::services::knowledge::{
    FtsRetriever, IngestPipeline, KnowledgeStore, RetrieverService,
};
use metakb::services::metadata::SchemaRegistry;
use metakb::storage::database::Database;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn test_store() -> KnowledgeStore {
    let database = Arc::new(Database::new_in_memory().unwrap());
    KnowledgeStore::new(database).unwrap()
}

fn write_doc(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

// ============================================================================
// Ingest Flow Tests
// ============================================================================

#[test]
fn test_ingest_directory_tags_and_stores() {
    let dir = TempDir::new().unwrap();
    write_doc(
        &dir,
        "formulation-topsecret1-3.txt",
        "Solvent ratios and extraction temperatures for the flagship line.",
    );
    write_doc(
        &dir,
        "trade-secret8-1.txt",
        "Rebate tiers per distributor volume band.",
    );

    let store = test_store();
    store
        .create_knowledge_base("research_archive", "Research samples", Some("research_register"))
        .unwrap();

    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));
    let report = pipeline.ingest_dir("research_archive", dir.path()).unwrap();

    assert_eq!(report.ingested, 2);
    assert!(report.failed.is_empty());
    assert_eq!(
        store.get_knowledge_base("research_archive").unwrap().doc_count,
        2
    );

    // Metadata survived the round trip through SQLite
    let doc = store
        .get_document("research_archive", "formulation-topsecret1-3.txt")
        .unwrap();
    assert_eq!(doc.metadata.level.as_deref(), Some("topsecret"));
    assert!(doc
        .metadata
        .sensitive_points
        .as_deref()
        .unwrap()
        .contains("formulation sheets"));

    let doc = store
        .get_document("research_archive", "trade-secret8-1.txt")
        .unwrap();
    assert!(doc
        .metadata
        .sensitive_points
        .as_deref()
        .unwrap()
        .contains("pricing agreements"));
}

#[test]
fn test_reingest_skips_unchanged_files() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "formulation-topsecret1-3.txt", "stable content");

    let store = test_store();
    store
        .create_knowledge_base("research_archive", "", Some("research_register"))
        .unwrap();
    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));

    let first = pipeline.ingest_dir("research_archive", dir.path()).unwrap();
    assert_eq!(first.ingested, 1);

    let second = pipeline.ingest_dir("research_archive", dir.path()).unwrap();
    assert_eq!(second.ingested, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(
        store.get_knowledge_base("research_archive").unwrap().doc_count,
        1
    );
}

#[test]
fn test_ingest_untagged_kb_records_base_fields() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "meeting_notes.txt", "Agenda and decisions.");

    let store = test_store();
    store.create_knowledge_base("scratch", "", None).unwrap();
    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));

    let report = pipeline.ingest_dir("scratch", dir.path()).unwrap();
    assert_eq!(report.ingested, 1);

    let doc = store.get_document("scratch", "meeting_notes.txt").unwrap();
    assert_eq!(doc.metadata.doc_id.len(), 36);
    assert!(doc.metadata.creation_date.is_some());
    assert!(doc.metadata.level.is_none());
    assert!(doc.metadata.sensitive_points.is_none());
}

#[test]
fn test_ingest_continues_past_malformed_names() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "formulation-topsecret1-3.txt", "good file");
    write_doc(&dir, "untagged notes.txt", "name without register segments");

    let store = test_store();
    store
        .create_knowledge_base("research_archive", "", Some("research_register"))
        .unwrap();
    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));

    let report = pipeline.ingest_dir("research_archive", dir.path()).unwrap();
    assert_eq!(report.ingested, 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.contains("untagged notes.txt"));
    assert_eq!(
        store.get_knowledge_base("research_archive").unwrap().doc_count,
        1
    );
}

// ============================================================================
// Search Flow Tests
// ============================================================================

fn seeded_search_store() -> KnowledgeStore {
    let dir = TempDir::new().unwrap();
    write_doc(
        &dir,
        "formulation-topsecret2-1.txt",
        "Extraction columns run at controlled extraction temperatures; extraction yield logged per batch.",
    );
    write_doc(
        &dir,
        "logistics-secret13-1.txt",
        "Routing plans mention extraction once among other topics.",
    );
    write_doc(
        &dir,
        "training-restricted14-1.txt",
        "Certification modules and exam windows.",
    );

    let store = test_store();
    store
        .create_knowledge_base("research_archive", "", Some("research_register"))
        .unwrap();
    let pipeline = IngestPipeline::new(store.clone(), Arc::new(SchemaRegistry::builtin()));
    let report = pipeline.ingest_dir("research_archive", dir.path()).unwrap();
    assert_eq!(report.ingested, 3);
    store
}

#[test]
fn test_search_returns_ranked_results() {
    let store = seeded_search_store();
    let retriever = FtsRetriever::new(store, 5, 0.0);

    let results = retriever.retrieve("research_archive", "extraction").unwrap();
    assert_eq!(results.len(), 2);
    // The document with repeated mentions ranks first
    assert_eq!(results[0].doc_name, "formulation-topsecret2-1.txt");
    assert!(results[0].score >= results[1].score);
    for doc in &results {
        assert!(doc.score > 0.0 && doc.score < 1.0);
    }
}

#[test]
fn test_search_is_scoped_to_knowledge_base() {
    let store = seeded_search_store();
    store.create_knowledge_base("empty_archive", "", None).unwrap();

    let retriever = FtsRetriever::new(store, 5, 0.0);
    let results = retriever.retrieve("empty_archive", "extraction").unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_search_threshold_filters_results() {
    let store = seeded_search_store();
    let strict = FtsRetriever::new(store, 5, 0.99);
    let results = strict.retrieve("research_archive", "extraction").unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_search_survives_query_punctuation() {
    let store = seeded_search_store();
    let retriever = FtsRetriever::new(store, 5, 0.0);

    let results = retriever
        .retrieve("research_archive", "\"extraction?\" (yield)")
        .unwrap();
    assert!(!results.is_empty());
}

#[test]
fn test_search_top_k_cuts_results() {
    let store = seeded_search_store();
    let retriever = FtsRetriever::new(store, 1, 0.0);
    let results = retriever.retrieve("research_archive", "extraction").unwrap();
    assert_eq!(results.len(), 1);
}
