//! Tool Implementations
//!
//! Knowledge tools exposed through the core tool registry.

pub mod search_knowledge;

pub use search_knowledge::{
    SearchKnowledgeOutput, SearchKnowledgeTool, SEARCH_KNOWLEDGE_TOOL_NAME,
};

use metakb_core::tool::ToolRegistry;
use std::sync::Arc;

use crate::services::knowledge::retriever::RetrieverService;
use crate::services::knowledge::store::KnowledgeStore;
use crate::utils::error::AppResult;

/// Build a registry holding the default knowledge tools.
///
/// The search tool's description snapshots the knowledge bases present at
/// build time; rebuild the registry after creating or deleting bases.
pub fn default_registry(
    store: KnowledgeStore,
    retriever: Arc<dyn RetrieverService>,
) -> AppResult<ToolRegistry> {
    let knowledge_bases = store.list_knowledge_bases()?;

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchKnowledgeTool::new(
        store,
        retriever,
        &knowledge_bases,
    )));
    Ok(registry)
}
