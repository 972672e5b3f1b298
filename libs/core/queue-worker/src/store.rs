//! Queue stores
//!
//! A store is an ordered list per queue name with atomic tail pushes and
//! atomic head pops. `RedisQueueStore` backs production; `MemoryQueueStore`
//! gives the same FIFO semantics in-process.

use crate::error::QueueError;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::trace;

/// Durable FIFO list operations the producer and the worker rely on.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append one serialized element to the tail of `queue`.
    async fn push_tail(&self, queue: &str, payload: &str) -> Result<(), QueueError>;

    /// Remove and return the head of `queue`, waiting up to `timeout` for one
    /// to arrive. `Ok(None)` means the wait elapsed with the queue empty.
    async fn pop_head_blocking(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, QueueError>;

    /// Number of elements currently in `queue`.
    async fn len(&self, queue: &str) -> Result<usize, QueueError>;
}

/// Redis list store (`RPUSH` / `BLPOP` / `LLEN`).
///
/// `BLPOP` holds the connection for the whole block timeout, so the worker
/// should get its own connection built with
/// `database::redis::connect_for_blocking_reads`.
#[derive(Clone)]
pub struct RedisQueueStore {
    redis: ConnectionManager,
}

impl RedisQueueStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn push_tail(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        let mut conn = self.redis.clone();
        conn.rpush::<_, _, ()>(queue, payload).await?;
        trace!(queue = %queue, "RPUSH");
        Ok(())
    }

    async fn pop_head_blocking(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, QueueError> {
        let mut conn = self.redis.clone();
        let popped: Option<(String, String)> = redis::cmd("BLPOP")
            .arg(queue)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;

        Ok(popped.map(|(_key, payload)| payload))
    }

    async fn len(&self, queue: &str) -> Result<usize, QueueError> {
        let mut conn = self.redis.clone();
        let length: usize = conn.llen(queue).await?;
        Ok(length)
    }
}

/// In-process store with the same FIFO and atomic-pop semantics.
///
/// Pops wait on a `Notify` that every push wakes, so a blocked consumer sees
/// a new element without polling.
#[derive(Default)]
pub struct MemoryQueueStore {
    queues: Mutex<HashMap<String, VecDeque<String>>>,
    pushed: Notify,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the elements of `queue`, head first.
    pub fn items(&self, queue: &str) -> Vec<String> {
        let queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        queues
            .get(queue)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn try_pop(&self, queue: &str) -> Option<String> {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        queues.get_mut(queue).and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn push_tail(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        {
            let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
            queues
                .entry(queue.to_string())
                .or_default()
                .push_back(payload.to_string());
        }
        self.pushed.notify_waiters();
        Ok(())
    }

    async fn pop_head_blocking(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, QueueError> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            // Register interest before checking so a push between the check
            // and the wait is not missed.
            let notified = self.pushed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(payload) = self.try_pop(queue) {
                return Ok(Some(payload));
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn len(&self, queue: &str) -> Result<usize, QueueError> {
        let queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(queues.get(queue).map_or(0, VecDeque::len))
    }
}
