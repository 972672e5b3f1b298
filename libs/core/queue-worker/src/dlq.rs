//! Dead letter entries
//!
//! A job that exhausted its retry budget is wrapped with the failure that
//! sank it and appended to the dead letter list.

use crate::registry::QueueJob;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterEntry {
    pub job_id: String,
    /// Queue the job was popped from
    pub source_queue: String,
    /// The job as it was last processed
    pub job: Value,
    pub error: String,
    pub retry_count: u32,
    pub failed_at: DateTime<Utc>,
}

impl DeadLetterEntry {
    pub fn new<J: QueueJob>(
        job: &J,
        source_queue: &str,
        error: &str,
        failed_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_id: job.job_id(),
            source_queue: source_queue.to_string(),
            job: serde_json::to_value(job)?,
            error: error.to_string(),
            retry_count: job.retry_count(),
            failed_at,
        })
    }
}
