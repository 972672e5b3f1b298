//! Prometheus metrics for queue workers
//!
//! Provides observability into worker throughput and failures.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::info;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder.
///
/// Call this once at startup. Subsequent calls return the existing handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    PROMETHEUS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics initialized");
        Ok(handle)
    })
}

/// Get the Prometheus handle for rendering metrics
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Render metrics in Prometheus format
pub fn render_metrics() -> Option<String> {
    prometheus_handle().map(|h| h.render())
}

/// Queue worker metrics helper, labelled by queue and processor
#[derive(Clone)]
pub struct QueueMetrics {
    queue_name: String,
    processor_name: String,
}

impl QueueMetrics {
    pub fn new(queue_name: impl Into<String>, processor_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            processor_name: processor_name.into(),
        }
    }

    /// Record a job popped and decoded
    pub fn job_received(&self) {
        counter!(
            "queue_worker_jobs_received_total",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }

    /// Record a job processed successfully
    pub fn job_processed(&self, duration: Duration) {
        counter!(
            "queue_worker_jobs_processed_total",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone(),
            "status" => "success"
        )
        .increment(1);

        histogram!(
            "queue_worker_job_duration_seconds",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a job whose processing failed
    pub fn job_failed(&self) {
        counter!(
            "queue_worker_jobs_processed_total",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone(),
            "status" => "failed"
        )
        .increment(1);
    }

    /// Record an element that did not decode and was discarded
    pub fn message_malformed(&self) {
        counter!(
            "queue_worker_messages_malformed_total",
            "queue" => self.queue_name.clone()
        )
        .increment(1);
    }

    /// Record a job re-pushed for another attempt
    pub fn job_retried(&self) {
        counter!(
            "queue_worker_jobs_retried_total",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }

    /// Record a job moved to the dead letter queue
    pub fn job_dead_lettered(&self) {
        counter!(
            "queue_worker_jobs_dlq_total",
            "queue" => self.queue_name.clone(),
            "processor" => self.processor_name.clone()
        )
        .increment(1);
    }

    /// Record a failed store round trip
    pub fn store_error(&self) {
        counter!(
            "queue_worker_store_errors_total",
            "queue" => self.queue_name.clone()
        )
        .increment(1);
    }

    /// Update queue depth gauge
    pub fn queue_depth(&self, depth: usize) {
        gauge!(
            "queue_worker_queue_depth",
            "queue" => self.queue_name.clone()
        )
        .set(depth as f64);
    }
}
