//! Notification processor for queue workers.
//!
//! `NotificationProcessor` implements `QueueProcessor<NotificationPayload>`:
//! it formats the payload into a sink record and appends it.

use crate::models::NotificationPayload;
use crate::sink::{NotificationSink, format_record};
use async_trait::async_trait;
use chrono::Utc;
use queue_worker::{QueueError, QueueProcessor};
use tracing::info;

pub struct NotificationProcessor<S: NotificationSink> {
    sink: S,
}

impl<S: NotificationSink + 'static> NotificationProcessor<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<S: NotificationSink + 'static> QueueProcessor<NotificationPayload>
    for NotificationProcessor<S>
{
    async fn process(&self, payload: &NotificationPayload) -> Result<(), QueueError> {
        let record = format_record(Utc::now(), payload)?;
        self.sink.append(&record).await?;

        info!(
            task_id = %payload.task_id,
            kind = %payload.kind,
            sink = self.sink.name(),
            "Processed notification"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NotificationProcessor"
    }
}
