//! Queue definitions for the notifications domain.

use queue_worker::QueueDef;

/// Due-soon notification queue, shared by the tasks API (producer) and the
/// notification worker (consumer).
pub struct NotificationQueue;

impl QueueDef for NotificationQueue {
    const QUEUE_NAME: &'static str = "task_notifications";

    const DEAD_LETTER_QUEUE: &'static str = "task_notifications:dlq";
}
