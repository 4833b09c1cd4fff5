//! Tool capability abstraction
//!
//! A [`ToolHandler`] is one callable capability: it describes itself with a
//! [`ToolDefinition`] (from which its argument schema is derived) and runs
//! with arguments that have already been validated against that schema.
//!
//! ```text
//! ToolRegistry ──▶ ToolHandler::definition() ──▶ ToolSchema
//!      │
//!      └──▶ ToolHandler::call(&ToolArguments) ──▶ Result<Value, ToolExecutionError>
//! ```
//!
//! Handlers are not retried by the agent loop. A returned error is recorded
//! as an execution failure and counts against the tool's circuit breaker.

use super::entities::ToolDefinition;
use super::schema::ToolArguments;
use super::value_objects::ToolExecutionError;
use async_trait::async_trait;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and parameters of this tool
    fn definition(&self) -> ToolDefinition;

    fn name(&self) -> String {
        self.definition().name
    }

    /// Run the tool with schema-validated arguments.
    async fn call(&self, args: &ToolArguments) -> Result<serde_json::Value, ToolExecutionError>;
}
