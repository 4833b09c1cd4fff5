//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`ToolHandler`]s and implements
//! [`ToolExecutorPort`]. It is built once at startup and read-only afterwards.
//!
//! # Usage
//!
//! ```ignore
//! use finwise_infrastructure::tools::{CompanyRegistryTool, ToolRegistry};
//!
//! let registry = ToolRegistry::new().register(CompanyRegistryTool::offline());
//! assert!(registry.has_tool("verify_company_registry"));
//!
//! let args = ToolArguments::new().with("company_name", "Tesla");
//! let record = registry.execute("verify_company_registry", &args).await?;
//! ```
//!
//! # Name conflicts
//!
//! Registering a second handler under an existing name replaces the first
//! (last registration wins) and logs a warning.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use finwise_application::ports::tool_executor::ToolExecutorPort;
use finwise_domain::tool::{ToolArguments, ToolExecutionError, ToolHandler, ToolSpec};

pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    tool_spec: ToolSpec,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            tool_spec: ToolSpec::new(),
        }
    }

    /// Register a tool handler
    pub fn register<H: ToolHandler + 'static>(self, handler: H) -> Self {
        self.register_arc(Arc::new(handler))
    }

    /// Register a tool handler (Arc version)
    pub fn register_arc(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        let definition = handler.definition();
        if self.handlers.contains_key(&definition.name) {
            tracing::warn!(tool = %definition.name, "Replacing previously registered tool");
        } else {
            tracing::debug!(tool = %definition.name, "Registered tool");
        }
        self.handlers.insert(definition.name.clone(), handler);
        self.tool_spec = self.tool_spec.register(definition);
        self
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(
        &self,
        name: &str,
        args: &ToolArguments,
    ) -> Result<serde_json::Value, ToolExecutionError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolExecutionError::failed(format!("Tool not found: {}", name)))?;

        tracing::debug!(tool = %name, args = args.len(), "Executing tool");
        handler.call(args).await
    }
}
