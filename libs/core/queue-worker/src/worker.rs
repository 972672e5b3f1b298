//! The generic QueueWorker loop and its start/stop handle.

use crate::config::WorkerConfig;
use crate::consumer::{Delivery, QueueConsumer};
use crate::dlq::DeadLetterEntry;
use crate::error::QueueError;
use crate::metrics::QueueMetrics;
use crate::producer::QueueProducer;
use crate::registry::{QueueJob, QueueProcessor};
use crate::store::QueueStore;
use chrono::Utc;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Lifecycle of a started worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Running,
    Stopped,
}

/// Generic queue worker that processes jobs one at a time.
///
/// The loop:
/// 1. blocking pop with `block_timeout`; a timeout just loops again
/// 2. a malformed element is logged and discarded
/// 3. a processing failure is logged, then dropped or retried per `max_retries`
/// 4. a store error sleeps `error_backoff` and loops again
///
/// The stop flag is checked between pops. A pop that is already waiting is
/// never cancelled, so nothing it removes from the queue can be lost to a stop.
pub struct QueueWorker<J, P>
where
    J: QueueJob,
    P: QueueProcessor<J>,
{
    consumer: QueueConsumer,
    /// Re-pushes to the source queue
    retry_producer: QueueProducer,
    /// Appends to the dead letter queue
    dlq_producer: QueueProducer,
    processor: Arc<P>,
    config: WorkerConfig,
    metrics: QueueMetrics,
    _phantom: PhantomData<J>,
}

impl<J, P> QueueWorker<J, P>
where
    J: QueueJob + 'static,
    P: QueueProcessor<J> + 'static,
{
    /// Create a new queue worker.
    pub fn new(store: Arc<dyn QueueStore>, processor: P, config: WorkerConfig) -> Self {
        Self::with_arc_processor(store, Arc::new(processor), config)
    }

    /// Create a new queue worker with an Arc processor.
    pub fn with_arc_processor(
        store: Arc<dyn QueueStore>,
        processor: Arc<P>,
        config: WorkerConfig,
    ) -> Self {
        let consumer = QueueConsumer::new(
            Arc::clone(&store),
            config.queue_name.clone(),
            config.block_timeout,
        );
        let retry_producer = QueueProducer::new(Arc::clone(&store), config.queue_name.clone());
        let dlq_producer = QueueProducer::new(store, config.dead_letter_queue.clone());
        let metrics = QueueMetrics::new(config.queue_name.clone(), processor.name());

        Self {
            consumer,
            retry_producer,
            dlq_producer,
            processor,
            config,
            metrics,
            _phantom: PhantomData,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the worker loop until the shutdown receiver reads `true`.
    ///
    /// Returns after the pop in flight when the stop was requested has
    /// completed and its element (if any) has been handled.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), QueueError> {
        info!(
            queue = %self.config.queue_name,
            dead_letter_queue = %self.config.dead_letter_queue,
            processor = %self.processor.name(),
            block_timeout_ms = self.config.block_timeout.as_millis() as u64,
            max_retries = self.config.max_retries,
            "Starting queue worker"
        );

        let mut consecutive_errors: u32 = 0;

        loop {
            if *shutdown.borrow() {
                info!("Received shutdown signal, stopping worker");
                break;
            }
            // Nobody can send a stop any more.
            if shutdown.has_changed().is_err() {
                warn!("Worker handle dropped, stopping worker");
                break;
            }

            match self.consumer.next::<J>().await {
                Ok(delivery) => {
                    if consecutive_errors > 0 {
                        info!("Queue store recovered after {} errors", consecutive_errors);
                        consecutive_errors = 0;
                    }

                    match delivery {
                        None => debug!("Block timeout, no messages"),
                        Some(Delivery::Job(job)) => self.process_job(job).await,
                        Some(Delivery::Malformed { raw, error }) => {
                            self.metrics.message_malformed();
                            warn!(
                                queue = %self.config.queue_name,
                                error = %error,
                                payload = %raw,
                                "Discarding malformed message"
                            );
                        }
                    }
                }
                Err(e) => {
                    consecutive_errors += 1;
                    self.metrics.store_error();
                    error!(
                        error = %e,
                        consecutive_errors,
                        backoff_ms = self.config.error_backoff.as_millis() as u64,
                        "Queue store error, backing off"
                    );

                    let stop_requested = tokio::select! {
                        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
                        _ = tokio::time::sleep(self.config.error_backoff) => false,
                    };
                    if stop_requested {
                        info!("Received shutdown signal during backoff, stopping worker");
                        break;
                    }
                }
            }
        }

        info!(queue = %self.config.queue_name, "Queue worker stopped");
        Ok(())
    }

    /// Spawn the loop on the runtime and return a handle to stop it.
    pub fn start(self) -> WorkerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(WorkerState::Running);

        let task = tokio::spawn(async move {
            let _stopped = MarkStoppedOnDrop(state_tx);
            self.run(shutdown_rx).await
        });

        WorkerHandle {
            shutdown: shutdown_tx,
            state: state_rx,
            task,
        }
    }

    async fn process_job(&self, job: J) {
        let job_id = job.job_id();
        self.metrics.job_received();
        debug!(job_id = %job_id, retry_count = job.retry_count(), "Processing job");

        let start = Instant::now();
        match self.processor.process(&job).await {
            Ok(()) => {
                self.metrics.job_processed(start.elapsed());
                debug!(job_id = %job_id, "Job processed");
            }
            Err(e) => {
                self.metrics.job_failed();
                warn!(
                    job_id = %job_id,
                    error = %e,
                    retry_count = job.retry_count(),
                    "Job processing failed"
                );
                self.handle_failure(&job, &e).await;
            }
        }
    }

    /// With no retry budget the job is dropped. Otherwise it goes back to the
    /// tail with its counter bumped, or to the dead letter queue once spent.
    async fn handle_failure(&self, job: &J, err: &QueueError) {
        if !self.config.retries_enabled() {
            return;
        }

        if !job.exceeded_max_retries(self.config.max_retries) {
            let retried = job.with_retry();
            match self.retry_producer.send(&retried).await {
                Ok(()) => {
                    self.metrics.job_retried();
                    info!(
                        job_id = %retried.job_id(),
                        retry_count = retried.retry_count(),
                        "Re-queued job for retry"
                    );
                }
                Err(e) => error!(job_id = %job.job_id(), error = %e, "Failed to re-queue job"),
            }
            return;
        }

        if self.config.dead_letter_queue.is_empty() {
            warn!(
                job_id = %job.job_id(),
                "Retries exhausted and no dead letter queue, dropping job"
            );
            return;
        }

        let failed_at = Utc::now();
        let entry = match DeadLetterEntry::new(
            job,
            &self.config.queue_name,
            &err.to_string(),
            failed_at,
        ) {
            Ok(entry) => entry,
            Err(e) => {
                error!(job_id = %job.job_id(), error = %e, "Failed to build dead letter entry");
                return;
            }
        };

        match self.dlq_producer.send(&entry).await {
            Ok(()) => {
                self.metrics.job_dead_lettered();
                info!(
                    job_id = %entry.job_id,
                    dead_letter_queue = %self.config.dead_letter_queue,
                    retry_count = entry.retry_count,
                    "Moved job to dead letter queue"
                );
            }
            Err(e) => error!(job_id = %entry.job_id, error = %e, "Failed to dead-letter job"),
        }
    }
}

struct MarkStoppedOnDrop(watch::Sender<WorkerState>);

impl Drop for MarkStoppedOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(WorkerState::Stopped);
    }
}

/// Handle to a worker started with [`QueueWorker::start`].
pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    state: watch::Receiver<WorkerState>,
    task: JoinHandle<Result<(), QueueError>>,
}

impl WorkerHandle {
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Receiver that follows the worker state, e.g. for a health endpoint.
    pub fn state_receiver(&self) -> watch::Receiver<WorkerState> {
        self.state.clone()
    }

    /// Request a stop and wait for the loop to exit.
    ///
    /// Latency is bounded by the block timeout: the pop already waiting is
    /// allowed to finish.
    pub async fn stop(self) -> Result<(), QueueError> {
        self.shutdown.send_replace(true);
        info!("Stop requested, waiting for worker loop to exit");

        self.task
            .await
            .map_err(|e| QueueError::Worker(e.to_string()))?
    }
}
