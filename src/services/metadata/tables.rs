//! Metadata Lookup Tables
//!
//! Static auxiliary data consulted by metadata schemas: flat profile tables
//! (level + category applied to every document of a knowledge base) and
//! nested sensitive-point registers (category -> level -> index -> text).
//! Built-in registers are constructed once behind OnceLock; additional
//! registers can be supplied through config.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::models::settings::RegisterEntries;

/// Text recorded when a register lookup finds no entry.
pub const SENSITIVE_POINT_FALLBACK: &str = "No sensitive point identified";

// ---------------------------------------------------------------------------
// Profile tables
// ---------------------------------------------------------------------------

/// Flat per-knowledge-base profile: one level and one category stamped onto
/// every document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub level: String,
    pub category: String,
}

impl ProfileTable {
    pub fn new(level: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            category: category.into(),
        }
    }
}

/// Profile for ordinary personal documents.
pub fn ordinary_profile() -> ProfileTable {
    ProfileTable::new("ordinary", "personal")
}

/// Profile for critical business documents.
pub fn critical_profile() -> ProfileTable {
    ProfileTable::new("critical", "business")
}

// ---------------------------------------------------------------------------
// Sensitive-point registers
// ---------------------------------------------------------------------------

/// Nested sensitive-point register.
///
/// Lookup path is category -> level -> point index. Misses at any depth are
/// not errors; callers fall back to [`SENSITIVE_POINT_FALLBACK`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivePointTable {
    name: String,
    entries: RegisterEntries,
}

impl SensitivePointTable {
    pub fn new(name: impl Into<String>, entries: RegisterEntries) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Register name, matching the schema name that binds it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the sensitive point text for a category/level/index triple.
    pub fn lookup(&self, category: &str, level: &str, index: u32) -> Option<&str> {
        self.entries
            .get(category)?
            .get(level)?
            .get(&index)
            .map(String::as_str)
    }

    /// Look up with the fixed fallback text on a miss.
    pub fn lookup_or_fallback(&self, category: &str, level: &str, index: u32) -> &str {
        self.lookup(category, level, index)
            .unwrap_or(SENSITIVE_POINT_FALLBACK)
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        categories.sort_unstable();
        categories
    }

    /// Total number of point entries across all categories and levels.
    pub fn entry_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|levels| levels.values())
            .map(|points| points.len())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Built-in registers
// ---------------------------------------------------------------------------

fn insert_entry(
    entries: &mut RegisterEntries,
    category: &str,
    level: &str,
    index: u32,
    text: &str,
) {
    entries
        .entry(category.to_string())
        .or_default()
        .entry(level.to_string())
        .or_default()
        .insert(index, text.to_string());
}

fn build_research_register() -> SensitivePointTable {
    let mut entries: RegisterEntries = HashMap::new();

    insert_entry(
        &mut entries,
        "formulation",
        "topsecret",
        1,
        "Complete formulation sheets for flagship product lines",
    );
    insert_entry(
        &mut entries,
        "formulation",
        "topsecret",
        2,
        "Core process parameters for extraction and purification",
    );
    insert_entry(
        &mut entries,
        "formulation",
        "secret",
        3,
        "Pilot-scale trial records and deviation reports",
    );
    insert_entry(
        &mut entries,
        "formulation",
        "restricted",
        4,
        "Supplier-specific raw material pretreatment notes",
    );
    insert_entry(
        &mut entries,
        "research",
        "topsecret",
        5,
        "Unpublished compound screening results",
    );
    insert_entry(
        &mut entries,
        "research",
        "secret",
        6,
        "Lead candidate stability study data",
    );
    insert_entry(
        &mut entries,
        "research",
        "restricted",
        7,
        "Internal research roadmap summaries",
    );
    insert_entry(
        &mut entries,
        "trade",
        "secret",
        8,
        "Customer pricing agreements and rebate schedules",
    );
    insert_entry(
        &mut entries,
        "trade",
        "restricted",
        9,
        "Regional distributor margin structures",
    );
    insert_entry(
        &mut entries,
        "resources",
        "secret",
        10,
        "Strategic reserve stock locations and volumes",
    );
    insert_entry(
        &mut entries,
        "resources",
        "restricted",
        11,
        "Rare input sourcing contracts",
    );
    insert_entry(
        &mut entries,
        "policy",
        "restricted",
        12,
        "Draft regulatory position papers",
    );
    insert_entry(
        &mut entries,
        "logistics",
        "secret",
        13,
        "Emergency supply routing plans",
    );
    insert_entry(
        &mut entries,
        "training",
        "restricted",
        14,
        "Certification exam question banks",
    );

    SensitivePointTable::new("research_register", entries)
}

fn build_casework_register() -> SensitivePointTable {
    let mut entries: RegisterEntries = HashMap::new();

    let points: [(&str, u32, &str); 10] = [
        (
            "stability",
            1,
            "Group petitions with escalation risk assessments",
        ),
        (
            "reputation",
            2,
            "Allegations affecting public institution credibility",
        ),
        (
            "personnel",
            3,
            "Unverified reports against senior appointees",
        ),
        ("extradition", 4, "Economic crime cases with suspects abroad"),
        ("majorfraud", 5, "Fraud cases above the major case threshold"),
        ("minorfraud", 6, "Fraud cases below the major case threshold"),
        ("bribery", 7, "Bribery allegations above the filing threshold"),
        (
            "pettybribery",
            8,
            "Bribery allegations below the filing threshold",
        ),
        (
            "incidents",
            9,
            "Workplace incident reports pending publication",
        ),
        ("statistics", 10, "Unreleased quarterly casework statistics"),
    ];

    for (category, index, text) in points {
        insert_entry(&mut entries, category, "classified", index, text);
    }

    SensitivePointTable::new("casework_register", entries)
}

/// Built-in register for research trade-secret archives (initialized once).
pub fn research_register() -> Arc<SensitivePointTable> {
    static TABLE: OnceLock<Arc<SensitivePointTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_research_register()))
        .clone()
}

/// Built-in register for casework complaint archives (initialized once).
pub fn casework_register() -> Arc<SensitivePointTable> {
    static TABLE: OnceLock<Arc<SensitivePointTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_casework_register()))
        .clone()
}
