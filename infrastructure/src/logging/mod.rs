//! Logging infrastructure: the audit trail.
//!
//! Provides [`JsonlAuditLogger`], a JSONL file writer that implements
//! the [`AuditLogger`](finwise_application::AuditLogger) port.

mod jsonl_audit;

pub use jsonl_audit::JsonlAuditLogger;
