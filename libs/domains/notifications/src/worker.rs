//! Wiring of the generic queue worker for notifications.

use crate::config::NotificationWorkerConfig;
use crate::models::NotificationPayload;
use crate::processor::NotificationProcessor;
use crate::sink::NotificationSink;
use queue_worker::{QueueStore, QueueWorker};
use std::sync::Arc;

pub type NotificationWorker<S> = QueueWorker<NotificationPayload, NotificationProcessor<S>>;

/// Build a worker that drains the notification queue into `sink`.
pub fn notification_worker<S: NotificationSink + 'static>(
    store: Arc<dyn QueueStore>,
    sink: S,
    config: &NotificationWorkerConfig,
) -> NotificationWorker<S> {
    QueueWorker::new(store, NotificationProcessor::new(sink), config.worker_config())
}
