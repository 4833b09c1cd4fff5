//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application
//! types by the `to_*` methods.

mod agent;
mod providers;
mod tools;

pub use agent::FileAgentConfig;
pub use providers::{FileGeminiConfig, FileGroqConfig, FileProviderConfig};
pub use tools::{FileExchangeRateConfig, FileRagConfig, FileRegistryConfig, FileToolsConfig};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("agent.failure_threshold must be at least 1")]
    InvalidFailureThreshold,

    #[error("{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("{field}: model name cannot be empty")]
    EmptyModelName { field: &'static str },

    #[error("provider.default: {0}")]
    UnknownProvider(String),

    #[error("tools.rag.k_chunks must be at least 1")]
    InvalidChunkCount,

    #[error("audit.path cannot be empty when audit is enabled")]
    EmptyAuditPath,
}

/// Audit trail settings (`[audit]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    pub enabled: bool,
    /// JSONL file, relative to the working directory unless absolute
    pub path: PathBuf,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("audit_trail.jsonl"),
        }
    }
}

/// Diagnostic log settings (`[logging]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling log files; empty disables file logging
    pub dir: String,
}

impl FileLoggingConfig {
    pub fn log_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Circuit breaker settings
    pub agent: FileAgentConfig,
    /// LLM provider settings
    pub provider: FileProviderConfig,
    /// Built-in tool settings
    pub tools: FileToolsConfig,
    /// Audit trail settings
    pub audit: FileAuditConfig,
    /// Diagnostic log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        issues.extend(self.agent.validate());
        issues.extend(self.provider.validate());
        issues.extend(self.tools.validate());
        if self.audit.enabled && self.audit.path.as_os_str().is_empty() {
            issues.push(ConfigValidationError::EmptyAuditPath);
        }
        issues
    }
}
