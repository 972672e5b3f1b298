//! Queue error types
//!
//! Store failures are loop-scope: the worker backs off and keeps going.
//! Serialization and processing failures are message-scope: the message is
//! logged and discarded (or retried when a retry budget is configured).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// The queue store could not be reached or rejected the command
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Job processing failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// The spawned worker task panicked or was aborted
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl QueueError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        QueueError::Unavailable(message.into())
    }

    pub fn processing(message: impl Into<String>) -> Self {
        QueueError::Processing(message.into())
    }
}

impl From<redis::RedisError> for QueueError {
    fn from(err: redis::RedisError) -> Self {
        QueueError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization(err.to_string())
    }
}
