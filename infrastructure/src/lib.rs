//! Infrastructure layer for finwise
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: LLM provider clients behind a fallback
//! gateway, the built-in tools and their registry, the JSONL audit
//! trail, and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlAuditLogger;
pub use providers::{
    FallbackGateway, GeminiClient, GroqClient, ModelFallbackPolicy, ProviderCallError,
    ProviderClient, build_gateway,
};
pub use tools::{
    CompanyRegistryTool, ExchangeRateTool, FinanceRagTool, InMemoryRetriever, ToolRegistry,
    ToolSettings, default_registry,
};
