//! Append-only record of executed tools.
//!
//! The runtime treats audit as best-effort bookkeeping: a sink failure is
//! logged and swallowed, never surfaced as a run failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One entry marking that a tool ran. The timestamp is assigned by the
/// sink at append time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub tool_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to append audit record: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode audit record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only sink for audit records. No read API; audit data is for
/// external inspection only.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, tool_name: &str) -> Result<(), AuditError>;
}

/// File-backed sink writing one JSON record per line. Appends are
/// serialized through a mutex so concurrent writers cannot interleave.
pub struct JsonlAuditSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn record(&self, tool_name: &str) -> Result<(), AuditError> {
        let record = AuditRecord {
            tool_name: tool_name.to_string(),
            timestamp: Utc::now(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// In-memory sink for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: std::sync::Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records appended so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, tool_name: &str) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(AuditRecord {
            tool_name: tool_name.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
