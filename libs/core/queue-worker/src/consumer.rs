//! Queue consumer
//!
//! Wraps one blocking pop and the JSON decode of whatever it returned.

use crate::error::QueueError;
use crate::store::QueueStore;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a pop that returned an element.
#[derive(Debug)]
pub enum Delivery<J> {
    /// The element decoded into a job.
    Job(J),
    /// The element was removed from the queue but is not a valid job.
    Malformed { raw: String, error: String },
}

/// Blocking consumer for a single queue.
#[derive(Clone)]
pub struct QueueConsumer {
    store: Arc<dyn QueueStore>,
    queue_name: String,
    block_timeout: Duration,
}

impl QueueConsumer {
    pub fn new(
        store: Arc<dyn QueueStore>,
        queue_name: impl Into<String>,
        block_timeout: Duration,
    ) -> Self {
        Self {
            store,
            queue_name: queue_name.into(),
            block_timeout,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Pop the head of the queue, waiting up to the block timeout.
    ///
    /// `Ok(None)` is a timeout with nothing to read. A store failure is an
    /// `Err`; a decode failure is `Delivery::Malformed` since the element is
    /// already gone from the queue.
    pub async fn next<J: DeserializeOwned>(&self) -> Result<Option<Delivery<J>>, QueueError> {
        let Some(raw) = self
            .store
            .pop_head_blocking(&self.queue_name, self.block_timeout)
            .await?
        else {
            return Ok(None);
        };

        let delivery = match serde_json::from_str::<J>(&raw) {
            Ok(job) => Delivery::Job(job),
            Err(e) => Delivery::Malformed {
                raw,
                error: e.to_string(),
            },
        };

        Ok(Some(delivery))
    }

    /// Current queue depth.
    pub async fn depth(&self) -> Result<usize, QueueError> {
        self.store.len(&self.queue_name).await
    }
}
