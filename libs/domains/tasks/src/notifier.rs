use async_trait::async_trait;
use domain_notifications::{NotificationPayload, NotificationQueue};
use queue_worker::{QueueError, QueueProducer, QueueStore};
use std::sync::Arc;

/// Hands a notification payload to the delivery pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// One durable append per call. `QueueError::Unavailable` when the queue
    /// cannot be reached.
    async fn enqueue(&self, payload: &NotificationPayload) -> Result<(), QueueError>;
}

/// [`Notifier`] that appends JSON payloads to the notification queue.
#[derive(Clone)]
pub struct QueueNotifier {
    producer: QueueProducer,
}

impl QueueNotifier {
    pub fn new(producer: QueueProducer) -> Self {
        Self { producer }
    }

    /// Notifier on the default `task_notifications` queue.
    pub fn for_store(store: Arc<dyn QueueStore>) -> Self {
        Self::new(QueueProducer::from_queue_def::<NotificationQueue>(store))
    }

    pub fn queue_name(&self) -> &str {
        self.producer.queue_name()
    }
}

#[async_trait]
impl Notifier for QueueNotifier {
    async fn enqueue(&self, payload: &NotificationPayload) -> Result<(), QueueError> {
        self.producer.send(payload).await
    }
}
