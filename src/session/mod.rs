//! Session event log
//!
//! Workflow milestones are appended as JSON lines, one file per session.
//! Persistence is best-effort: a failed write is logged and the workflow
//! carries on.

use crate::error::{BrandForgeError, Result};
use crate::types::BrandBrief;
use crate::validation::ReportSummary;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A workflow milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started { brief: BrandBrief },
    Generated { iteration: u32, names: Vec<String> },
    Selected { iteration: u32, names: Vec<String> },
    Validated { iteration: u32, summary: ReportSummary },
    Regenerated { iteration: u32 },
    Accepted { iteration: u32, warning: Option<String> },
    Aborted { iteration: u32, reason: String },
}

/// One line of the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Destination for session events. Fire-and-forget.
pub trait SessionSink: Send + Sync {
    fn persist(&self, event: &SessionEvent);
}

/// Discards every event
pub struct NullSessionSink;

impl SessionSink for NullSessionSink {
    fn persist(&self, _event: &SessionEvent) {}
}

/// Append-only JSON-lines session log
pub struct JsonlSessionLog {
    session_id: String,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSessionLog {
    /// New log file `session_<timestamp>.jsonl` under `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let session_id = format!("session_{}", Utc::now().format("%Y%m%d_%H%M%S_%3f"));
        let path = dir.as_ref().join(format!("{}.jsonl", session_id));
        Self {
            session_id,
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &SessionEvent) -> Result<()> {
        let record = SessionRecord {
            session_id: self.session_id.clone(),
            recorded_at: Utc::now(),
            event: event.clone(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BrandForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BrandForgeError::io(e.to_string(), Some(self.path.to_string_lossy().to_string())))?;

        file.write_all(line.as_bytes())
            .map_err(|e| BrandForgeError::io(e.to_string(), Some(self.path.to_string_lossy().to_string())))
    }

    /// Read back every record of a session log
    pub fn load(path: &Path) -> Result<Vec<SessionRecord>> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrandForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| BrandForgeError::parse(e.to_string(), Some(line.to_string())))
            })
            .collect()
    }
}

impl SessionSink for JsonlSessionLog {
    fn persist(&self, event: &SessionEvent) {
        if let Err(e) = self.append(event) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist session event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlSessionLog::new(dir.path());

        log.persist(&SessionEvent::Started {
            brief: BrandBrief::new("meal planner", "parents", "warm", "food"),
        });
        log.persist(&SessionEvent::Regenerated { iteration: 1 });

        let records = JsonlSessionLog::load(log.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0].event, SessionEvent::Started { .. }));
        assert_eq!(records[1].event, SessionEvent::Regenerated { iteration: 1 });
        assert!(records.iter().all(|r| r.session_id == log.session_id()));
    }

    #[test]
    fn test_event_tag_format() {
        let json = serde_json::to_value(SessionEvent::Aborted {
            iteration: 0,
            reason: "user".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "aborted");
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let log = JsonlSessionLog::new(&blocker);
        log.persist(&SessionEvent::Regenerated { iteration: 1 });
        assert!(!log.path().exists());
    }
}
