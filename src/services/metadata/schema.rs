//! Metadata Schemas
//!
//! A schema turns a document on disk into its [`DocumentMetadata`] record.
//! Every schema fills the base fields (fresh UUID, document name, file
//! modification time) and then derives its domain fields from the document
//! name:
//!
//! - [`ProfileSchema`] splits the stem on `_`, takes the first segment as
//!   the document type, and stamps the bound profile's level and category.
//! - [`SensitivePointSchema`] splits the stem on `-`, reads the category
//!   from the first segment and a combined `<level><index>` from the
//!   second, then resolves the sensitive point text from its register.
//!
//! Schema instances are created through the constructor functions at the
//! bottom, which bind a lookup table to a named schema. Two knowledge bases
//! can share one register by binding the same `Arc`.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::services::metadata::filename::{doc_stem, parse_level_index, split_stem};
use crate::services::metadata::model::DocumentMetadata;
use crate::services::metadata::tables::{ProfileTable, SensitivePointTable};
use crate::utils::error::{AppError, AppResult};

/// Derives a metadata record for a document at ingestion time.
pub trait MetadataSchema: Send + Sync {
    /// Schema name, referenced from knowledge base config.
    fn name(&self) -> &str;

    /// Titles of the fields this schema fills, in render order.
    fn describe_fields(&self) -> Vec<&'static str>;

    /// Build the metadata record for `doc_name` at `file_path`.
    fn acquire(&self, doc_name: &str, file_path: &Path) -> AppResult<DocumentMetadata>;
}

/// Base record shared by all schemas: fresh ID, document name, and the
/// file's modification time as the creation date.
pub fn base_metadata(doc_name: &str, file_path: &Path) -> AppResult<DocumentMetadata> {
    let modified = std::fs::metadata(file_path)?.modified()?;
    let creation_date = DateTime::<Local>::from(modified)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    Ok(DocumentMetadata {
        doc_id: Uuid::new_v4().to_string(),
        doc_name: doc_name.to_string(),
        creation_date: Some(creation_date),
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// ProfileSchema
// ---------------------------------------------------------------------------

/// Schema backed by a flat profile table.
///
/// Document names look like `type1_quarterly_notes.txt`: the first `_`
/// segment becomes the document type, level and category come from the
/// profile.
pub struct ProfileSchema {
    name: String,
    profile: ProfileTable,
}

impl MetadataSchema for ProfileSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe_fields(&self) -> Vec<&'static str> {
        vec![
            "Document ID",
            "Document Name",
            "Document Type",
            "Level",
            "Category",
            "Creation Date",
        ]
    }

    fn acquire(&self, doc_name: &str, file_path: &Path) -> AppResult<DocumentMetadata> {
        let mut metadata = base_metadata(doc_name, file_path)?;

        let stem = doc_stem(doc_name);
        let doc_type = stem.split('_').next().unwrap_or(stem);

        metadata.doc_type = Some(doc_type.to_string());
        metadata.level = Some(self.profile.level.clone());
        metadata.category = Some(self.profile.category.clone());
        Ok(metadata)
    }
}

// ---------------------------------------------------------------------------
// SensitivePointSchema
// ---------------------------------------------------------------------------

/// Schema backed by a nested sensitive-point register.
///
/// Document names look like `formulation-secret3-1.txt`: category, then a
/// combined level/index segment, then a free sequence part. A register miss
/// records the fixed fallback text rather than failing the document.
pub struct SensitivePointSchema {
    name: String,
    register: Arc<SensitivePointTable>,
}

impl SensitivePointSchema {
    /// The register this schema resolves points from.
    pub fn register(&self) -> &Arc<SensitivePointTable> {
        &self.register
    }
}

impl MetadataSchema for SensitivePointSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe_fields(&self) -> Vec<&'static str> {
        vec![
            "Document ID",
            "Document Name",
            "Document Type",
            "Level",
            "Sensitive Points",
            "Creation Date",
        ]
    }

    fn acquire(&self, doc_name: &str, file_path: &Path) -> AppResult<DocumentMetadata> {
        let mut metadata = base_metadata(doc_name, file_path)?;

        let stem = doc_stem(doc_name);
        let parts = split_stem(stem, '-');
        if parts.len() < 2 {
            return Err(AppError::parse(format!(
                "document name '{}' does not match '<category>-<level><index>-...'",
                doc_name
            )));
        }

        let category = parts[0];
        let (level, index) = parse_level_index(parts[1])?;
        let sensitive_points = self
            .register
            .lookup_or_fallback(category, &level, index)
            .to_string();

        metadata.doc_type = Some(category.to_string());
        metadata.level = Some(level);
        metadata.sensitive_points = Some(sensitive_points);
        Ok(metadata)
    }
}

// ---------------------------------------------------------------------------
// Schema constructors
// ---------------------------------------------------------------------------

/// Bind a profile table to a named schema.
pub fn profile_schema(name: impl Into<String>, profile: ProfileTable) -> Arc<dyn MetadataSchema> {
    Arc::new(ProfileSchema {
        name: name.into(),
        profile,
    })
}

/// Bind a sensitive-point register to a named schema.
pub fn sensitive_point_schema(
    name: impl Into<String>,
    register: Arc<SensitivePointTable>,
) -> Arc<dyn MetadataSchema> {
    Arc::new(SensitivePointSchema {
        name: name.into(),
        register,
    })
}
