//! Tasks API Service
//!
//! HTTP entry point for task CRUD. Tasks that are created or updated with a
//! due date inside the next 24 hours get a `due_soon` notification appended
//! to the Redis notification queue.
//!
//! ## Endpoints
//!
//! - `POST/GET /tasks`, `GET/PUT/DELETE /tasks/{id}`
//! - `GET /health` liveness
//! - `GET /ready` Redis readiness

pub mod config;

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, create_app, create_router, health_router, run_health_checks};
use core_config::AppInfo;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::redis::{ConnectionManager, check_health, connect_from_config_with_retry};
use domain_tasks::{InMemoryTaskRepository, Notifier, QueueNotifier, TaskRepository, TaskService, handlers};
use eyre::{Result, WrapErr};
use queue_worker::{QueueProducer, RedisQueueStore};
use std::sync::Arc;
use tracing::info;

use config::Config;

/// Task routes plus liveness.
pub fn app_router<R, N>(service: TaskService<R, N>, app_info: AppInfo) -> Router
where
    R: TaskRepository + 'static,
    N: Notifier + 'static,
{
    handlers::router(service).merge(health_router(app_info))
}

async fn ready_handler(State(redis): State<ConnectionManager>) -> impl IntoResponse {
    let mut conn = redis;
    let redis_check: HealthCheckFuture<'_> =
        Box::pin(async move { check_health(&mut conn).await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("redis", redis_check)]).await
}

/// `GET /ready`: 200 while Redis answers PING, 503 otherwise.
pub fn ready_router(redis: ConnectionManager) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(redis)
}

/// Run the tasks API until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid, Redis stays unreachable
/// after the retry budget, or the listener cannot bind.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(name = %config.app.name, version = %config.app.version, "Starting tasks API");

    info!("Connecting to Redis...");
    let redis = connect_from_config_with_retry(config.redis.clone(), None)
        .await
        .wrap_err("Failed to connect to Redis")?;
    info!("Connected to Redis successfully");

    let store = Arc::new(RedisQueueStore::new(redis.clone()));
    let notifier = QueueNotifier::new(QueueProducer::new(store, config.queue_name.clone()));
    info!(queue = %notifier.queue_name(), "Due-soon notifications enabled");

    let service = TaskService::new(InMemoryTaskRepository::new(), notifier);
    let router = create_router(app_router(service, config.app.clone()).merge(ready_router(redis)));

    create_app(router, &config.server)
        .await
        .wrap_err("HTTP server failed")?;

    info!("Tasks API stopped");
    Ok(())
}
