//! Worker loop behaviour against the in-memory store.

use async_trait::async_trait;
use queue_worker::{
    MemoryQueueStore, QueueError, QueueJob, QueueProcessor, QueueStore, QueueWorker,
    WorkerConfig, WorkerState,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

const QUEUE: &str = "test_notifications";
const DLQ: &str = "test_notifications:dlq";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestJob {
    task_id: String,
    #[serde(default)]
    attempts: u32,
}

impl TestJob {
    fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            attempts: 0,
        }
    }
}

impl QueueJob for TestJob {
    fn job_id(&self) -> String {
        self.task_id.clone()
    }

    fn retry_count(&self) -> u32 {
        self.attempts
    }

    fn with_retry(&self) -> Self {
        Self {
            attempts: self.attempts + 1,
            ..self.clone()
        }
    }
}

/// Reports every processed job on a channel; optionally fails or waits on a gate.
struct RecordingProcessor {
    seen: mpsc::UnboundedSender<TestJob>,
    fail: bool,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl QueueProcessor<TestJob> for RecordingProcessor {
    async fn process(&self, job: &TestJob) -> Result<(), QueueError> {
        let _ = self.seen.send(job.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(QueueError::processing("sink unavailable"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordingProcessor"
    }
}

fn recording(fail: bool) -> (RecordingProcessor, mpsc::UnboundedReceiver<TestJob>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        RecordingProcessor {
            seen: tx,
            fail,
            gate: None,
        },
        rx,
    )
}

fn config() -> WorkerConfig {
    WorkerConfig::new(QUEUE)
        .with_dead_letter_queue(DLQ)
        .with_block_timeout(Duration::from_millis(100))
        .with_error_backoff(Duration::from_millis(50))
}

async fn push(store: &MemoryQueueStore, job: &TestJob) {
    store
        .push_tail(QUEUE, &serde_json::to_string(job).unwrap())
        .await
        .unwrap();
}

async fn next_seen(rx: &mut mpsc::UnboundedReceiver<TestJob>) -> TestJob {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("worker did not process a job in time")
        .expect("processor dropped")
}

#[tokio::test]
async fn test_jobs_are_processed_in_fifo_order() {
    let store = Arc::new(MemoryQueueStore::new());
    for id in ["task-1", "task-2", "task-3"] {
        push(&store, &TestJob::new(id)).await;
    }
    let (processor, mut seen) = recording(false);

    let handle = QueueWorker::new(store.clone(), processor, config()).start();

    let mut order = Vec::new();
    for _ in 0..3 {
        order.push(next_seen(&mut seen).await.task_id);
    }
    handle.stop().await.unwrap();

    assert_eq!(order, vec!["task-1", "task-2", "task-3"]);
    assert_eq!(store.len(QUEUE).await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_entry_is_discarded_and_loop_continues() {
    let store = Arc::new(MemoryQueueStore::new());
    store.push_tail(QUEUE, "this is not json").await.unwrap();
    store.push_tail(QUEUE, r#"{"title":"no task id"}"#).await.unwrap();
    push(&store, &TestJob::new("task-ok")).await;
    let (processor, mut seen) = recording(false);

    let handle = QueueWorker::new(store.clone(), processor, config()).start();

    assert_eq!(next_seen(&mut seen).await.task_id, "task-ok");
    assert_eq!(handle.state(), WorkerState::Running);
    handle.stop().await.unwrap();

    assert_eq!(store.len(QUEUE).await.unwrap(), 0);
    assert!(store.items(DLQ).is_empty());
}

#[tokio::test]
async fn test_stop_leaves_unread_messages_in_queue() {
    let store = Arc::new(MemoryQueueStore::new());
    for id in ["task-1", "task-2", "task-3"] {
        push(&store, &TestJob::new(id)).await;
    }
    let gate = Arc::new(Notify::new());
    let (mut processor, mut seen) = recording(false);
    processor.gate = Some(gate.clone());

    let handle = QueueWorker::new(store.clone(), processor, config()).start();
    assert_eq!(next_seen(&mut seen).await.task_id, "task-1");

    // Stop while task-1 is still in the processor, then let it finish.
    let stopping = tokio::spawn(handle.stop());
    tokio::time::sleep(Duration::from_millis(20)).await;
    gate.notify_one();
    stopping.await.unwrap().unwrap();

    let remaining: Vec<TestJob> = store
        .items(QUEUE)
        .iter()
        .map(|raw| serde_json::from_str(raw).unwrap())
        .collect();
    let ids: Vec<&str> = remaining.iter().map(|j| j.task_id.as_str()).collect();
    assert_eq!(ids, vec!["task-2", "task-3"]);
}

#[tokio::test]
async fn test_stop_returns_within_one_block_timeout() {
    let store = Arc::new(MemoryQueueStore::new());
    let (processor, _seen) = recording(false);
    let config = config().with_block_timeout(Duration::from_millis(200));

    let handle = QueueWorker::new(store.clone(), processor, config).start();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let state = handle.state_receiver();
    assert_eq!(*state.borrow(), WorkerState::Running);

    let started = std::time::Instant::now();
    handle.stop().await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(200) + Duration::from_millis(150));
    assert_eq!(*state.borrow(), WorkerState::Stopped);

    // Anything enqueued afterwards waits for the next worker.
    push(&store, &TestJob::new("task-later")).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.len(QUEUE).await.unwrap(), 1);
}

#[tokio::test]
async fn test_dropping_the_handle_stops_the_loop() {
    let store = Arc::new(MemoryQueueStore::new());
    let (processor, _seen) = recording(false);

    let handle = QueueWorker::new(store.clone(), processor, config()).start();
    let mut state = handle.state_receiver();
    drop(handle);

    tokio::time::timeout(
        Duration::from_secs(1),
        state.wait_for(|s| *s == WorkerState::Stopped),
    )
    .await
    .expect("worker kept running without a handle")
    .unwrap();

    push(&store, &TestJob::new("task-orphan")).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(store.len(QUEUE).await.unwrap(), 1);
}

#[tokio::test]
async fn test_run_returns_when_stop_sender_is_gone() {
    let store = Arc::new(MemoryQueueStore::new());
    let (processor, _seen) = recording(false);
    let worker = QueueWorker::new(store, processor, config());

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    drop(shutdown_tx);

    tokio::time::timeout(Duration::from_secs(1), worker.run(shutdown_rx))
        .await
        .expect("run kept looping")
        .unwrap();
}

/// Fails the first `failures` pops, then behaves like the wrapped store.
struct FlakyStore {
    inner: MemoryQueueStore,
    failures: AtomicU32,
}

#[async_trait]
impl QueueStore for FlakyStore {
    async fn push_tail(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        self.inner.push_tail(queue, payload).await
    }

    async fn pop_head_blocking(
        &self,
        queue: &str,
        timeout: Duration,
    ) -> Result<Option<String>, QueueError> {
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(QueueError::unavailable("connection refused"));
        }
        self.inner.pop_head_blocking(queue, timeout).await
    }

    async fn len(&self, queue: &str) -> Result<usize, QueueError> {
        self.inner.len(queue).await
    }
}

#[tokio::test]
async fn test_store_errors_back_off_then_recover() {
    let store = Arc::new(FlakyStore {
        inner: MemoryQueueStore::new(),
        failures: AtomicU32::new(3),
    });
    store
        .push_tail(QUEUE, &serde_json::to_string(&TestJob::new("task-1")).unwrap())
        .await
        .unwrap();
    let (processor, mut seen) = recording(false);

    let started = std::time::Instant::now();
    let handle = QueueWorker::new(store.clone(), processor, config()).start();

    assert_eq!(next_seen(&mut seen).await.task_id, "task-1");
    assert!(started.elapsed() >= Duration::from_millis(150));
    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_interrupts_error_backoff() {
    let store = Arc::new(FlakyStore {
        inner: MemoryQueueStore::new(),
        failures: AtomicU32::new(u32::MAX),
    });
    let (processor, _seen) = recording(false);
    let config = config().with_error_backoff(Duration::from_secs(30));

    let handle = QueueWorker::new(store, processor, config).start();
    tokio::time::sleep(Duration::from_millis(30)).await;

    tokio::time::timeout(Duration::from_secs(1), handle.stop())
        .await
        .expect("stop should not wait out the backoff")
        .unwrap();
}

#[tokio::test]
async fn test_failed_job_is_dropped_without_retry_budget() {
    let store = Arc::new(MemoryQueueStore::new());
    push(&store, &TestJob::new("task-1")).await;
    push(&store, &TestJob::new("task-2")).await;
    let (processor, mut seen) = recording(true);

    let handle = QueueWorker::new(store.clone(), processor, config()).start();

    assert_eq!(next_seen(&mut seen).await.task_id, "task-1");
    assert_eq!(next_seen(&mut seen).await.task_id, "task-2");
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.stop().await.unwrap();

    assert!(seen.try_recv().is_err());
    assert_eq!(store.len(QUEUE).await.unwrap(), 0);
    assert!(store.items(DLQ).is_empty());
}

#[tokio::test]
async fn test_failed_job_is_retried_then_dead_lettered() {
    let store = Arc::new(MemoryQueueStore::new());
    push(&store, &TestJob::new("task-1")).await;
    let (processor, mut seen) = recording(true);

    let handle =
        QueueWorker::new(store.clone(), processor, config().with_max_retries(2)).start();

    let attempts: Vec<u32> = vec![
        next_seen(&mut seen).await.attempts,
        next_seen(&mut seen).await.attempts,
        next_seen(&mut seen).await.attempts,
    ];
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.stop().await.unwrap();

    assert_eq!(attempts, vec![0, 1, 2]);
    assert_eq!(store.len(QUEUE).await.unwrap(), 0);

    let dead = store.items(DLQ);
    assert_eq!(dead.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(&dead[0]).unwrap();
    assert_eq!(entry["jobId"], "task-1");
    assert_eq!(entry["sourceQueue"], QUEUE);
    assert_eq!(entry["retryCount"], 2);
    assert_eq!(entry["job"]["attempts"], 2);
    assert!(entry["error"].as_str().unwrap().contains("sink unavailable"));
}
