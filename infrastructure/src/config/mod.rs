//! Configuration loading for finwise
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./finwise.toml` or `./.finwise.toml`
//! 3. Global: `$XDG_CONFIG_HOME/finwise/config.toml`
//! 4. `FINWISE_*` environment variables
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileAuditConfig, FileConfig, FileExchangeRateConfig,
    FileGeminiConfig, FileGroqConfig, FileLoggingConfig, FileProviderConfig, FileRagConfig,
    FileRegistryConfig, FileToolsConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
