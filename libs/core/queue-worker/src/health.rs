//! Health check handlers for queue workers.
//!
//! - Liveness (`/health`): 200 while the worker loop is running
//! - Readiness (`/ready`): 200 when the queue store answers, with the depth
//! - Prometheus metrics (`/metrics`)

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::consumer::QueueConsumer;
use crate::metrics::{self, QueueMetrics};
use crate::worker::WorkerState;

/// Shared state for health endpoints.
#[derive(Clone)]
pub struct HealthState {
    pub app_name: String,
    pub app_version: String,
    /// Consumer of the monitored queue, used for depth checks.
    pub consumer: QueueConsumer,
    /// Follows the worker started with `QueueWorker::start`.
    pub worker_state: watch::Receiver<WorkerState>,
}

impl HealthState {
    pub fn new(
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        consumer: QueueConsumer,
        worker_state: watch::Receiver<WorkerState>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: app_version.into(),
            consumer,
            worker_state,
        }
    }
}

/// Health response for liveness probes.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: String,
    pub version: String,
    pub worker: WorkerState,
}

/// Liveness probe handler.
pub async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let worker = *state.worker_state.borrow();
    let (code, status) = match worker {
        WorkerState::Running => (StatusCode::OK, "healthy"),
        WorkerState::Stopped => (StatusCode::SERVICE_UNAVAILABLE, "stopped"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            name: state.app_name,
            version: state.app_version,
            worker,
        }),
    )
}

/// Readiness probe handler.
pub async fn ready_handler(
    State(state): State<HealthState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match state.consumer.depth().await {
        Ok(depth) => {
            QueueMetrics::new(state.consumer.queue_name(), "health").queue_depth(depth);
            Ok((
                StatusCode::OK,
                Json(json!({
                    "status": "ready",
                    "queue": state.consumer.queue_name(),
                    "depth": depth,
                })),
            ))
        }
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "queue": state.consumer.queue_name(),
                "error": e.to_string(),
            })),
        )),
    }
}

/// Prometheus metrics endpoint handler.
pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Some(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            output,
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Metrics not initialized. Call metrics::init_metrics() at startup.".to_string(),
        )
            .into_response(),
    }
}

/// Router with `/health`, `/healthz`, `/ready`, `/readyz` and `/metrics`.
pub fn health_router(state: HealthState) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/readyz", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryQueueStore, QueueStore};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state(worker: WorkerState) -> (HealthState, Arc<MemoryQueueStore>) {
        let store = Arc::new(MemoryQueueStore::new());
        let consumer = QueueConsumer::new(store.clone(), "jobs", Duration::from_millis(10));
        let (_tx, rx) = watch::channel(worker);
        (HealthState::new("test-worker", "1.0.0", consumer, rx), store)
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_running_worker() {
        let (state, _store) = state(WorkerState::Running);

        let (status, body) = get_json(health_router(state), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["worker"], "running");
        assert_eq!(body["name"], "test-worker");
    }

    #[tokio::test]
    async fn test_health_unavailable_when_stopped() {
        let (state, _store) = state(WorkerState::Stopped);

        let (status, body) = get_json(health_router(state), "/healthz").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["worker"], "stopped");
    }

    #[tokio::test]
    async fn test_ready_reports_queue_depth() {
        let (state, store) = state(WorkerState::Running);
        store.push_tail("jobs", "{}").await.unwrap();
        store.push_tail("jobs", "{}").await.unwrap();

        let (status, body) = get_json(health_router(state), "/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["queue"], "jobs");
        assert_eq!(body["depth"], 2);
    }
}
