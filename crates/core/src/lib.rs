//! MetaKB Core
//!
//! Foundational traits and error types for the MetaKB workspace. This crate
//! has zero dependencies on application-level code (database, config,
//! filesystem walkers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `tool` - Tool abstraction (`ToolDefinition`, `ToolExecutable`, `Tool`, `ToolRegistry`)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based abstractions** - enables mocking, testing, and future crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod tool;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Tool Trait ─────────────────────────────────────────────────────────
pub use tool::{Tool, ToolDefinition, ToolExecutable, ToolRegistry};
