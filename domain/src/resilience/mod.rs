//! Failure isolation for tool execution.

pub mod circuit_breaker;

pub use circuit_breaker::{CircuitBreaker, Clock, SystemClock};
