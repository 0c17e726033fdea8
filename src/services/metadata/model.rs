//! Metadata Model
//!
//! The metadata record attached to every ingested document. Domain fields
//! are optional: a document ingested into a knowledge base without a
//! registered schema carries only the base fields.

use serde::{Deserialize, Serialize};

/// Metadata record for a single document.
///
/// Built once at ingestion time and treated as read-only afterwards.
/// Persisted as JSON alongside the document row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Unique metadata record ID (UUID v4)
    pub doc_id: String,
    /// Document file name, including extension
    pub doc_name: String,
    /// Document type parsed from the file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Classification or profile level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Document category from the profile table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Sensitive point text resolved from a register lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitive_points: Option<String>,
    /// File modification time, formatted `%Y-%m-%d %H:%M:%S`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl DocumentMetadata {
    /// Populated fields as `(title, value)` pairs in presentation order.
    ///
    /// Unset optional fields are skipped, so the formatted block only shows
    /// what a schema actually filled in.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields: Vec<(&'static str, &str)> = vec![
            ("Document ID", self.doc_id.as_str()),
            ("Document Name", self.doc_name.as_str()),
        ];
        if let Some(doc_type) = &self.doc_type {
            fields.push(("Document Type", doc_type));
        }
        if let Some(level) = &self.level {
            fields.push(("Level", level));
        }
        if let Some(category) = &self.category {
            fields.push(("Category", category));
        }
        if let Some(points) = &self.sensitive_points {
            fields.push(("Sensitive Points", points));
        }
        if let Some(date) = &self.creation_date {
            fields.push(("Creation Date", date));
        }
        fields
    }
}
