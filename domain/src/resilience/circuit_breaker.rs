//! Per-key circuit breaker
//!
//! Tracks consecutive failures per tool name. A key is open when it has at
//! least `failure_threshold` failures and the last one happened less than
//! `reset_timeout` ago. Expired entries are purged lazily by [`CircuitBreaker::is_open`];
//! there is no background timer.
//!
//! The breaker is advisory: callers check [`is_open`](CircuitBreaker::is_open)
//! before running a tool and report the outcome afterwards.
//!
//! ```
//! use finwise_domain::resilience::CircuitBreaker;
//! use std::time::Duration;
//!
//! let breaker = CircuitBreaker::new(2, Duration::from_secs(60));
//! breaker.record_failure("get_exchange_rate");
//! breaker.record_failure("get_exchange_rate");
//! assert!(breaker.is_open("get_exchange_rate"));
//!
//! breaker.record_success("get_exchange_rate");
//! assert!(!breaker.is_open("get_exchange_rate"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Time source for the breaker.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct CircuitState {
    consecutive_failures: u32,
    last_failure: Instant,
}

/// Shared, thread-safe failure tracker keyed by tool name.
pub struct CircuitBreaker {
    failure_threshold: u32,
    reset_timeout: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<HashMap<String, CircuitState>>,
}

impl CircuitBreaker {
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
    pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self::with_clock(failure_threshold, reset_timeout, Arc::new(SystemClock))
    }

    pub fn with_clock(
        failure_threshold: u32,
        reset_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            clock,
            state: Mutex::new(HashMap::new()),
        }
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn reset_timeout(&self) -> Duration {
        self.reset_timeout
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CircuitState>> {
        // State is plain counters; a panic mid-update cannot leave it inconsistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether calls for `key` should currently be refused.
    pub fn is_open(&self, key: &str) -> bool {
        let mut state = self.lock();
        let Some(entry) = state.get(key).copied() else {
            return false;
        };
        if entry.consecutive_failures < self.failure_threshold {
            return false;
        }
        let elapsed = self.clock.now().saturating_duration_since(entry.last_failure);
        if elapsed >= self.reset_timeout {
            state.remove(key);
            return false;
        }
        true
    }

    pub fn record_failure(&self, key: &str) {
        let now = self.clock.now();
        let mut state = self.lock();
        let entry = state.entry(key.to_string()).or_insert(CircuitState {
            consecutive_failures: 0,
            last_failure: now,
        });
        entry.consecutive_failures = entry.consecutive_failures.saturating_add(1);
        entry.last_failure = now;
    }

    /// Full reset for `key`.
    pub fn record_success(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Current consecutive failure count (0 when no entry exists).
    pub fn failure_count(&self, key: &str) -> u32 {
        self.lock()
            .get(key)
            .map(|s| s.consecutive_failures)
            .unwrap_or(0)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAILURE_THRESHOLD, Self::DEFAULT_RESET_TIMEOUT)
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("failure_threshold", &self.failure_threshold)
            .field("reset_timeout", &self.reset_timeout)
            .field("tracked_keys", &self.lock().len())
            .finish()
    }
}
