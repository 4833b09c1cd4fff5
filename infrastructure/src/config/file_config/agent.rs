//! Agent configuration from TOML (`[agent]` section)

use super::ConfigValidationError;
use finwise_application::AgentParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// failure_threshold = 3        # consecutive failures before a tool is disabled
/// reset_timeout_seconds = 60   # how long a disabled tool stays disabled
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub failure_threshold: u32,
    pub reset_timeout_seconds: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = AgentParams::default();
        Self {
            failure_threshold: params.failure_threshold,
            reset_timeout_seconds: params.reset_timeout.as_secs(),
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.failure_threshold == 0 {
            issues.push(ConfigValidationError::InvalidFailureThreshold);
        }
        if self.reset_timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout {
                field: "agent.reset_timeout_seconds",
            });
        }
        issues
    }

    pub fn to_agent_params(&self) -> AgentParams {
        AgentParams::default()
            .with_failure_threshold(self.failure_threshold)
            .with_reset_timeout(Duration::from_secs(self.reset_timeout_seconds))
    }
}
