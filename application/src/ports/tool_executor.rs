//! Tool Executor port
//!
//! Defines the interface for running the agent's tools.

use async_trait::async_trait;
use finwise_domain::tool::{ToolArguments, ToolDefinition, ToolExecutionError, ToolSpec};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// Arguments reaching [`execute`](Self::execute) have already been validated
/// against the tool's schema; implementations do not re-validate types.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Definitions offered to the LLM, sorted by name
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tool_spec().sorted().into_iter().cloned().collect()
    }

    /// Run a tool by name
    async fn execute(
        &self,
        name: &str,
        args: &ToolArguments,
    ) -> Result<serde_json::Value, ToolExecutionError>;
}
