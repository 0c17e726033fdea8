//! Integration Tests Module
//!
//! End-to-end tests for the knowledge system: metadata schema resolution and
//! tagging, the ingest-to-search flow through the SQLite store, and the
//! search tool executing through the core tool registry.

// Metadata schema and registry tests
mod metadata_test;

// Ingest and full-text search tests
mod knowledge_test;

// Search tool execution tests
mod search_tool_test;
