//! Queue registry types and definitions.
//!
//! This module provides:
//! - `QueueDef` trait for domain-specific queue definitions
//! - `QueueJob` trait for job payloads
//! - `QueueProcessor` trait for job processors

use crate::error::QueueError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Queue definition trait.
///
/// Each domain implements this trait so producers and workers agree on
/// list names.
///
/// # Example
///
/// ```rust,ignore
/// use queue_worker::QueueDef;
///
/// pub struct EmailQueue;
///
/// impl QueueDef for EmailQueue {
///     const QUEUE_NAME: &'static str = "email_jobs";
///     const DEAD_LETTER_QUEUE: &'static str = "email_jobs:dlq";
/// }
/// ```
pub trait QueueDef: Send + Sync {
    /// The Redis list key jobs are pushed to and popped from.
    const QUEUE_NAME: &'static str;

    /// The list key for jobs that exhausted their retries.
    const DEAD_LETTER_QUEUE: &'static str;

    fn queue_name() -> &'static str {
        Self::QUEUE_NAME
    }

    fn dead_letter_queue() -> &'static str {
        Self::DEAD_LETTER_QUEUE
    }
}

/// Trait for queue job payloads.
///
/// The worker only needs an identifier for logs and a retry counter that
/// travels inside the payload, since a list element carries no metadata.
pub trait QueueJob: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the job ID for logging and tracking.
    fn job_id(&self) -> String;

    /// Returns how many times this job has already been re-pushed.
    fn retry_count(&self) -> u32;

    /// Creates a new job with an incremented retry count.
    fn with_retry(&self) -> Self;

    /// Check if the job has used up its retry budget.
    fn exceeded_max_retries(&self, max_retries: u32) -> bool {
        self.retry_count() >= max_retries
    }
}

/// Trait for job processors.
///
/// # Example
///
/// ```rust,ignore
/// use queue_worker::{QueueError, QueueProcessor};
///
/// struct EmailProcessor {
///     email_provider: Arc<dyn EmailProvider>,
/// }
///
/// #[async_trait]
/// impl QueueProcessor<EmailJob> for EmailProcessor {
///     async fn process(&self, job: &EmailJob) -> Result<(), QueueError> {
///         self.email_provider.send(&job.to_email, &job.subject).await?;
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "EmailProcessor"
///     }
/// }
/// ```
#[async_trait]
pub trait QueueProcessor<J: QueueJob>: Send + Sync {
    /// Process a single job.
    async fn process(&self, job: &J) -> Result<(), QueueError>;

    /// Get the processor name for logging and metric labels.
    fn name(&self) -> &'static str;
}
