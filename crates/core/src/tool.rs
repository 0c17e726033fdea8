//! Tool Trait
//!
//! Defines the core-layer tool abstraction with split definition/execution traits:
//!
//! - `ToolDefinition` - Identity and parameter schema
//! - `ToolExecutable` - Execution capability
//! - `Tool` - Combined trait (auto-implemented via blanket impl)
//! - `ToolRegistry` - O(1) lookup registry with ordered iteration
//!
//! The split design lets schema-only consumers (prompt builders, CLI listings)
//! enumerate tools without touching execution dependencies, and lets tests mock
//! definition and execution independently. Tools own their service handles, so
//! execution takes only the JSON arguments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Trait Definitions
// ============================================================================

/// Tool definition metadata trait.
///
/// Provides identity and schema information about a tool without
/// requiring execution capability. Separating definition from execution
/// allows the registry to enumerate tools without instantiating executors.
pub trait ToolDefinition: Send + Sync {
    /// Unique name of this tool (e.g., "search_knowledge").
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does.
    ///
    /// Sent verbatim to LLM providers, so it should spell out when the
    /// tool applies and what its arguments mean.
    fn description(&self) -> &str;

    /// JSON schema describing input parameters.
    ///
    /// Should conform to JSON Schema draft-07. Example:
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "query": { "type": "string", "description": "Search query" }
    ///   },
    ///   "required": ["query"]
    /// }
    /// ```
    fn parameters_schema(&self) -> Value;
}

/// Tool execution trait.
///
/// Provides the execution capability for a tool. Separated from
/// `ToolDefinition` so that definition-only consumers (e.g., schema
/// generation) don't need to depend on execution infrastructure.
#[async_trait]
pub trait ToolExecutable: Send + Sync {
    /// Execute the tool with the given arguments.
    ///
    /// # Arguments
    /// - `args` - JSON arguments matching the tool's `parameters_schema()`
    ///
    /// # Returns
    /// - `Ok(Value)` - The tool's output as a JSON value
    /// - `Err(CoreError)` - If the tool execution failed
    async fn execute(&self, args: Value) -> CoreResult<Value>;
}

/// Combined trait for tools that provide both definition and execution.
///
/// Most tools implement this combined trait. The separation into
/// `ToolDefinition` + `ToolExecutable` is useful for:
/// - Test doubles (mock execution, real definition)
/// - Schema-only consumers (LLM prompt generation, CLI listings)
pub trait Tool: ToolDefinition + ToolExecutable {}

// Blanket implementation: anything that implements both traits is a Tool
impl<T: ToolDefinition + ToolExecutable> Tool for T {}

// ============================================================================
// ToolRegistry
// ============================================================================

/// Registry for `Tool` implementations.
///
/// Provides O(1) lookup by name, ordered iteration, and dynamic
/// registration/unregistration. Iteration order is registration order so
/// that tool listings shown to LLMs stay deterministic.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Insertion order for deterministic iteration.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Unregister a tool by name. Returns the removed tool, or None.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.order.retain(|n| n != name);
        self.tools.remove(name)
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool definitions as JSON values in registration order.
    ///
    /// Suitable for sending to LLM providers or generating documentation.
    pub fn definitions(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// Returns `Err(CoreError::NotFound)` if the tool is not registered.
    pub async fn execute(&self, name: &str, args: Value) -> CoreResult<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(CoreError::not_found(format!("Tool not found: {}", name))),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
