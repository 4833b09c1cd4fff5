//! JSONL file writer for audit events.
//!
//! Each [`AuditEvent`] becomes one JSON line:
//!
//! ```text
//! {"type":"TOOL_CALL","timestamp":"2026-10-19T08:15:02.113Z","query":"...","details":{...}}
//! ```
//!
//! The file is opened in append mode so the trail survives restarts.

use finwise_application::ports::audit_logger::{AuditError, AuditEvent, AuditLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// JSONL audit logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every record is flushed.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open (or create) the audit file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &AuditEvent) -> serde_json::Value {
        serde_json::json!({
            "type": event.event_type.as_str(),
            "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "query": event.query,
            "details": event.details,
        })
    }
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&Self::record(&event))
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finwise_application::ports::audit_logger::AuditEventType;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit_trail.jsonl");
        let logger = JsonlAuditLogger::open(&path).unwrap();

        logger
            .log(AuditEvent::new(
                AuditEventType::UserQuery,
                "Convert 1 USD to NGN",
                serde_json::json!({}),
            ))
            .unwrap();
        logger
            .log(AuditEvent::new(
                AuditEventType::ToolCall,
                "Convert 1 USD to NGN",
                serde_json::json!({"tool": "get_exchange_rate", "result": 800}),
            ))
            .unwrap();
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "USER_QUERY");
        assert_eq!(records[0]["query"], "Convert 1 USD to NGN");
        assert!(records[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(records[1]["type"], "TOOL_CALL");
        assert_eq!(records[1]["details"]["tool"], "get_exchange_rate");
        assert_eq!(records[1]["details"]["result"], 800);
    }

    #[test]
    fn test_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        for answer in ["first", "second"] {
            let logger = JsonlAuditLogger::open(&path).unwrap();
            logger
                .log(AuditEvent::new(
                    AuditEventType::FinalAnswer,
                    "q",
                    serde_json::json!({ "answer": answer }),
                ))
                .unwrap();
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["details"]["answer"], "first");
        assert_eq!(records[1]["details"]["answer"], "second");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = JsonlAuditLogger::open(blocker.join("audit.jsonl"));
        assert!(matches!(result, Err(AuditError::Io(_))));
    }
}
