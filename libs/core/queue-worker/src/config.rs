//! Worker configuration
//!
//! This module provides `WorkerConfig` for configuring the queue worker.

use crate::registry::QueueDef;
use std::time::Duration;

/// Smallest block timeout sent to the store. `BLPOP` treats zero as
/// "block forever", which would make stop requests unobservable.
const MIN_BLOCK_TIMEOUT: Duration = Duration::from_millis(10);

/// Configuration for the queue worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Queue (list key) the worker pops from
    pub queue_name: String,

    /// Dead letter queue for jobs that exhausted their retries (empty = none)
    pub dead_letter_queue: String,

    /// Bounded wait of a single blocking pop
    pub block_timeout: Duration,

    /// Pause after a store error before the next pop
    pub error_backoff: Duration,

    /// Re-push budget for failed jobs (0 = drop after one attempt)
    pub max_retries: u32,
}

impl WorkerConfig {
    /// Create a new WorkerConfig from a QueueDef
    pub fn from_queue_def<Q: QueueDef>() -> Self {
        Self::new(Q::QUEUE_NAME).with_dead_letter_queue(Q::DEAD_LETTER_QUEUE)
    }

    /// Create a new WorkerConfig with default timings
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            dead_letter_queue: String::new(),
            block_timeout: Duration::from_secs(1),
            error_backoff: Duration::from_secs(1),
            max_retries: 0,
        }
    }

    /// Set the dead letter queue name
    pub fn with_dead_letter_queue(mut self, queue: impl Into<String>) -> Self {
        self.dead_letter_queue = queue.into();
        self
    }

    /// Set the blocking pop timeout
    pub fn with_block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = timeout.max(MIN_BLOCK_TIMEOUT);
        self
    }

    /// Set the backoff applied after store errors
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Set the retry budget for failed jobs
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// True when failed jobs go somewhere other than the floor
    pub fn retries_enabled(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new("queue:jobs")
    }
}
