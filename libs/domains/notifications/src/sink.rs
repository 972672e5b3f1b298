//! Notification sinks.
//!
//! The worker's durable side effect: one line per processed payload,
//! appended in dequeue order.

use crate::error::NotificationResult;
use crate::models::NotificationPayload;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Build the sink line for a payload: `<ISO-8601> - Notify: <JSON>\n`.
pub fn format_record(
    now: DateTime<Utc>,
    payload: &NotificationPayload,
) -> NotificationResult<String> {
    Ok(format!(
        "{} - Notify: {}\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        serde_json::to_string(payload)?
    ))
}

/// Append-only destination for formatted records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Append one complete record.
    async fn append(&self, record: &str) -> NotificationResult<()>;

    /// Get the sink name for logging.
    fn name(&self) -> &'static str;
}

/// Appends records to a file, creating it on first write.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NotificationSink for FileSink {
    async fn append(&self, record: &str) -> NotificationResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        // One write per record so concurrent appenders never interleave a line.
        file.write_all(record.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), bytes = record.len(), "Appended notification record");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
