//! Context Formatting
//!
//! Renders retrieved documents into a prompt-ready text block. Metadata goes
//! in as labeled lines ahead of the content so a model can cite level,
//! category, and sensitive points directly.

use crate::services::knowledge::retriever::RetrievedDocument;
use crate::services::metadata::model::DocumentMetadata;

/// Returned instead of a context block when a search yields nothing.
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found. Try a different query.";

/// Render a metadata record as "Label: value" lines. Unset fields are
/// omitted.
pub fn format_metadata_block(metadata: &DocumentMetadata) -> String {
    metadata
        .fields()
        .into_iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format retrieved documents into a context block for prompt injection.
pub fn format_context_block(results: &[RetrievedDocument]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut block = String::new();
    for (i, doc) in results.iter().enumerate() {
        block.push_str(&format!(
            "### Source {} (score: {:.2}, document: {})\n\n",
            i + 1,
            doc.score,
            doc.doc_name
        ));
        block.push_str(&format_metadata_block(&doc.metadata));
        block.push_str("\n\n");
        block.push_str(&doc.content);
        block.push_str("\n\n---\n\n");
    }

    block
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
