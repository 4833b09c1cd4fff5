//! Agent parameters: tool-failure isolation for the agent loop.
//!
//! [`AgentParams`] groups the static settings that shape how
//! [`ProcessQueryUseCase`](crate::use_cases::process_query::ProcessQueryUseCase)
//! guards its tools. These are application-layer concerns, not domain policy.

use finwise_domain::CircuitBreaker;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    /// Consecutive execution failures before a tool is disabled.
    pub failure_threshold: u32,
    /// How long a disabled tool stays disabled after its last failure.
    pub reset_timeout: Duration,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            failure_threshold: CircuitBreaker::DEFAULT_FAILURE_THRESHOLD,
            reset_timeout: CircuitBreaker::DEFAULT_RESET_TIMEOUT,
        }
    }
}

impl AgentParams {
    // ==================== Builder Methods ====================

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    /// Breaker shared by every turn of this process.
    pub fn circuit_breaker(&self) -> CircuitBreaker {
        CircuitBreaker::new(self.failure_threshold, self.reset_timeout)
    }
}
