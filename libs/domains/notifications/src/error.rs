//! Error types for the notifications domain.

use queue_worker::QueueError;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur in the notifications domain.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Appending to the sink failed.
    #[error("Sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// A payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Queue store error.
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

impl From<NotificationError> for QueueError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Queue(inner) => inner,
            other => QueueError::processing(other.to_string()),
        }
    }
}
