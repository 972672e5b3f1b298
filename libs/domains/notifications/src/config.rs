//! Notification worker configuration.

use crate::queues::NotificationQueue;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use queue_worker::{QueueDef, WorkerConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "notifications.log";

#[derive(Debug, Clone)]
pub struct NotificationWorkerConfig {
    pub queue_name: String,
    pub dead_letter_queue: String,
    /// File the sink appends records to
    pub log_file: PathBuf,
    pub block_timeout: Duration,
    pub error_backoff: Duration,
    pub max_retries: u32,
}

impl NotificationWorkerConfig {
    /// Settings for the generic queue worker
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::new(self.queue_name.clone())
            .with_dead_letter_queue(self.dead_letter_queue.clone())
            .with_block_timeout(self.block_timeout)
            .with_error_backoff(self.error_backoff)
            .with_max_retries(self.max_retries)
    }
}

impl Default for NotificationWorkerConfig {
    fn default() -> Self {
        Self {
            queue_name: NotificationQueue::QUEUE_NAME.to_string(),
            dead_letter_queue: NotificationQueue::DEAD_LETTER_QUEUE.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            block_timeout: Duration::from_secs(1),
            error_backoff: Duration::from_secs(1),
            max_retries: 0,
        }
    }
}

impl FromEnv for NotificationWorkerConfig {
    /// Reads from environment variables:
    /// - QUEUE_NAME: defaults to `task_notifications`
    /// - NOTIFICATION_DLQ: defaults to `task_notifications:dlq`
    /// - LOG_FILE: defaults to `notifications.log`
    /// - NOTIFICATION_BLOCK_TIMEOUT_MS: defaults to 1000
    /// - NOTIFICATION_ERROR_BACKOFF_MS: defaults to 1000
    /// - NOTIFICATION_MAX_RETRIES: defaults to 0 (failed writes are dropped)
    fn from_env() -> Result<Self, ConfigError> {
        let queue_name = env_or_default("QUEUE_NAME", NotificationQueue::QUEUE_NAME);
        let dead_letter_queue =
            env_or_default("NOTIFICATION_DLQ", NotificationQueue::DEAD_LETTER_QUEUE);
        let log_file = PathBuf::from(env_or_default("LOG_FILE", DEFAULT_LOG_FILE));
        let block_timeout_ms: u64 = env_parse("NOTIFICATION_BLOCK_TIMEOUT_MS", 1000)?;
        let error_backoff_ms: u64 = env_parse("NOTIFICATION_ERROR_BACKOFF_MS", 1000)?;
        let max_retries: u32 = env_parse("NOTIFICATION_MAX_RETRIES", 0)?;

        if block_timeout_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "NOTIFICATION_BLOCK_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            queue_name,
            dead_letter_queue,
            log_file,
            block_timeout: Duration::from_millis(block_timeout_ms),
            error_backoff: Duration::from_millis(error_backoff_ms),
            max_retries,
        })
    }
}
