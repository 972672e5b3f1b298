//! Queue producer for job enqueuing
//!
//! Any service (API, CLI, etc.) can use this to queue jobs for the worker.
//! Each `send` is exactly one append; nothing is buffered client-side.
//!
//! # Example
//!
//! ```rust,ignore
//! use queue_worker::{QueueProducer, RedisQueueStore};
//!
//! let producer = QueueProducer::from_queue_def::<EmailQueue>(Arc::new(RedisQueueStore::new(redis)));
//! producer.send(&job).await?;
//! ```

use crate::error::QueueError;
use crate::registry::QueueDef;
use crate::store::QueueStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Generic queue producer.
#[derive(Clone)]
pub struct QueueProducer {
    store: Arc<dyn QueueStore>,
    queue_name: String,
}

impl QueueProducer {
    /// Create a new QueueProducer for a specific queue.
    pub fn new(store: Arc<dyn QueueStore>, queue_name: impl Into<String>) -> Self {
        Self {
            store,
            queue_name: queue_name.into(),
        }
    }

    /// Create a producer from a `QueueDef` implementation.
    pub fn from_queue_def<Q: QueueDef>(store: Arc<dyn QueueStore>) -> Self {
        Self::new(store, Q::QUEUE_NAME)
    }

    /// Get the queue name.
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Serialize a job to JSON and append it to the queue tail.
    pub async fn send<J: Serialize>(&self, job: &J) -> Result<(), QueueError> {
        let job_json = serde_json::to_string(job)?;
        self.send_raw(&job_json).await
    }

    /// Append an already serialized element to the queue tail.
    pub async fn send_raw(&self, payload: &str) -> Result<(), QueueError> {
        self.store.push_tail(&self.queue_name, payload).await?;

        debug!(queue = %self.queue_name, bytes = payload.len(), "Enqueued job");
        Ok(())
    }
}
