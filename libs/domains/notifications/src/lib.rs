//! Notifications Domain
//!
//! The "due soon" notification pipeline: the payload placed on the queue by
//! the tasks domain, and the worker side that appends one record per payload
//! to a durable sink.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TaskService   │  ← enqueues NotificationPayload::due_soon
//! └────────┬────────┘
//!          │ RPUSH
//! ┌────────▼────────┐
//! │   Redis List    │  ← task_notifications
//! └────────┬────────┘
//!          │ BLPOP
//! ┌────────▼────────┐
//! │  QueueWorker    │  ← NotificationProcessor
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │    FileSink     │  ← notifications.log
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_notifications::{FileSink, NotificationWorkerConfig, notification_worker};
//!
//! let config = NotificationWorkerConfig::from_env()?;
//! let sink = FileSink::new(&config.log_file);
//! let handle = notification_worker(store, sink, &config).start();
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod processor;
pub mod queues;
pub mod sink;
pub mod worker;

// Re-export commonly used types
pub use config::NotificationWorkerConfig;
pub use error::{NotificationError, NotificationResult};
pub use models::{DELIVERY_KEY, DUE_SOON, DeliveryInfo, NotificationPayload};
pub use processor::NotificationProcessor;
pub use queues::NotificationQueue;
pub use sink::{FileSink, NotificationSink, format_record};
pub use worker::{NotificationWorker, notification_worker};
