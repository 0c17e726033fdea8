//! Search Knowledge Tool
//!
//! Model-facing tool that answers natural-language queries against the local
//! knowledge bases. The description enumerates every available base so the
//! caller can pick the right one by name.

use async_trait::async_trait;
use metakb_core::error::{CoreError, CoreResult};
use metakb_core::tool::{ToolDefinition, ToolExecutable};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use crate::services::knowledge::context::format_context_block;
use crate::services::knowledge::retriever::{RetrievedDocument, RetrieverService};
use crate::services::knowledge::store::{KnowledgeBase, KnowledgeStore};
use crate::utils::error::AppResult;

pub const SEARCH_KNOWLEDGE_TOOL_NAME: &str = "search_knowledge";

/// Structured output of a knowledge search.
///
/// `Display` renders the formatted context block, so the output can be
/// dropped straight into a prompt.
#[derive(Debug, Serialize)]
pub struct SearchKnowledgeOutput {
    pub knowledge_base: String,
    pub results: Vec<RetrievedDocument>,
    pub context: String,
}

impl fmt::Display for SearchKnowledgeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context)
    }
}

/// Tool searching local knowledge bases through the retriever service.
pub struct SearchKnowledgeTool {
    store: KnowledgeStore,
    retriever: Arc<dyn RetrieverService>,
    description: String,
}

impl SearchKnowledgeTool {
    /// Build the tool with a description listing the given knowledge bases.
    pub fn new(
        store: KnowledgeStore,
        retriever: Arc<dyn RetrieverService>,
        knowledge_bases: &[KnowledgeBase],
    ) -> Self {
        let description = Self::build_description(knowledge_bases);
        Self {
            store,
            retriever,
            description,
        }
    }

    /// Run a search against one knowledge base and build the output.
    pub fn search(&self, database: &str, query: &str) -> AppResult<SearchKnowledgeOutput> {
        // Reject unknown bases before querying the index
        self.store.get_knowledge_base(database)?;

        let results = self.retriever.retrieve(database, query)?;
        let context = format_context_block(&results);

        Ok(SearchKnowledgeOutput {
            knowledge_base: database.to_string(),
            results,
            context,
        })
    }

    fn build_description(knowledge_bases: &[KnowledgeBase]) -> String {
        let kb_info = knowledge_bases
            .iter()
            .map(|kb| format!("{}: {}", kb.name, kb.description))
            .collect::<Vec<_>>()
            .join("\n");
        let keys = knowledge_bases
            .iter()
            .map(|kb| kb.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Search one or more of these local knowledge bases for information:\n\
             {}\n\
             Only knowledge stored in these bases is searched with this tool. \
             The 'database' argument must be one of: [{}].",
            kb_info, keys
        )
    }
}

impl ToolDefinition for SearchKnowledgeTool {
    fn name(&self) -> &str {
        SEARCH_KNOWLEDGE_TOOL_NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Name of the knowledge base to search"
                },
                "query": {
                    "type": "string",
                    "description": "Query text in natural language"
                }
            },
            "required": ["database", "query"]
        })
    }
}

#[async_trait]
impl ToolExecutable for SearchKnowledgeTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let database = args
            .get("database")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::validation("Missing required parameter: database"))?;
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| CoreError::validation("Missing required parameter: query"))?;

        let output = self.search(database, query).map_err(CoreError::from)?;

        tracing::info!(kb = %database, results = output.results.len(), "Knowledge search executed");

        Ok(serde_json::to_value(&output)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
