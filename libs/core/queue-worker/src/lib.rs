//! Queue Worker Framework
//!
//! A generic worker framework over a durable FIFO list (a Redis list in
//! production) for processing background jobs.
//!
//! ## Features
//!
//! - **Generic worker**: `QueueWorker<J, P>` processes any job type
//! - **Blocking reads**: `BLPOP` with a bounded wait so stop requests are observed
//! - **Cooperative stop**: a pop in flight always completes before the loop exits
//! - **Dead Letter Queue**: optional re-push with an attempt budget, then DLQ
//! - **Prometheus metrics**: Built-in observability
//! - **Health endpoints**: liveness with worker state and queue depth
//!
//! ## Example
//!
//! ```ignore
//! use queue_worker::{QueueDef, QueueJob, QueueProcessor, QueueWorker, RedisQueueStore, WorkerConfig};
//!
//! struct MyQueue;
//! impl QueueDef for MyQueue {
//!     const QUEUE_NAME: &'static str = "my_jobs";
//!     const DEAD_LETTER_QUEUE: &'static str = "my_jobs:dlq";
//! }
//!
//! let store = Arc::new(RedisQueueStore::new(redis));
//! let config = WorkerConfig::from_queue_def::<MyQueue>();
//! let handle = QueueWorker::new(store, processor, config).start();
//! // ...
//! handle.stop().await?;
//! ```

mod config;
mod consumer;
mod dlq;
mod error;
mod health;
pub mod metrics;
mod producer;
mod registry;
mod store;
mod worker;

// Re-export main types
pub use config::WorkerConfig;
pub use consumer::{Delivery, QueueConsumer};
pub use dlq::DeadLetterEntry;
pub use error::QueueError;
pub use health::{HealthState, health_router};
pub use metrics::{QueueMetrics, init_metrics};
pub use producer::QueueProducer;
pub use registry::{QueueDef, QueueJob, QueueProcessor};
pub use store::{MemoryQueueStore, QueueStore, RedisQueueStore};
pub use worker::{QueueWorker, WorkerHandle, WorkerState};
