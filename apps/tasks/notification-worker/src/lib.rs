//! Notification Worker Service
//!
//! Drains the `task_notifications` Redis list with blocking pops and appends
//! one `<timestamp> - Notify: <json>` line per entry to `LOG_FILE`.
//!
//! A small side server on `METRICS_PORT` exposes `/health`, `/ready` and
//! Prometheus `/metrics` for the worker.

pub mod config;

use axum_helpers::{serve, shutdown_signal};
use core_config::AppInfo;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::retry;
use database::redis::{connect, connect_for_blocking_reads};
use domain_notifications::{FileSink, NotificationWorkerConfig, notification_worker};
use eyre::{Result, WrapErr};
use queue_worker::{
    HealthState, QueueConsumer, QueueStore, RedisQueueStore, health_router, init_metrics,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use config::Config;

/// Side server exposing `/health`, `/ready` and `/metrics` for the worker.
pub struct HealthServer {
    pub listener: TcpListener,
    /// Store for readiness depth checks. Must not share the worker's
    /// connection, where `LLEN` would wait behind an in-flight `BLPOP`.
    pub store: Arc<dyn QueueStore>,
}

/// Runs the notification pipeline against `store` until `shutdown` resolves.
///
/// When `health` is given, the health/metrics router is served on its
/// listener for the lifetime of the worker.
pub async fn run_worker<F>(
    store: Arc<dyn QueueStore>,
    app: &AppInfo,
    config: &NotificationWorkerConfig,
    health: Option<HealthServer>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let sink = FileSink::new(&config.log_file);
    let worker = notification_worker(store, sink, config);

    info!(
        queue = %config.queue_name,
        log_file = %config.log_file.display(),
        "Starting notification worker"
    );
    let handle = worker.start();

    let (stop_health, health_stopped) = oneshot::channel::<()>();
    let health_task = health.map(|HealthServer { listener, store }| {
        let consumer = QueueConsumer::new(store, &config.queue_name, config.block_timeout);
        let state = HealthState::new(app.name, app.version, consumer, handle.state_receiver());
        tokio::spawn(async move {
            let stopped = async move {
                let _ = health_stopped.await;
            };
            if let Err(e) = serve(listener, health_router(state), stopped).await {
                error!(error = %e, "Health server failed");
            }
        })
    });

    shutdown.await;
    info!("Shutdown requested, stopping worker");

    let _ = stop_health.send(());
    let result = handle.stop().await.wrap_err("Notification worker failed");

    if let Some(task) = health_task {
        if let Err(e) = task.await {
            warn!(error = %e, "Health server task ended abnormally");
        }
    }

    result
}

/// Run the notification worker until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid, Redis stays unreachable
/// after the retry budget, or the worker loop fails.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    info!(name = %config.app.name, version = %config.app.version, "Starting notification worker service");

    if let Err(e) = init_metrics() {
        warn!(error = %e, "Prometheus recorder not installed, /metrics will be unavailable");
    }

    let url = config.redis.url().to_string();
    let block_timeout = config.notifications.block_timeout;
    info!("Connecting to Redis...");
    let redis = retry(|| connect_for_blocking_reads(&url, block_timeout))
        .await
        .wrap_err("Failed to connect to Redis")?;
    info!("Connected to Redis successfully");

    let health = if config.metrics_port == 0 {
        None
    } else {
        let addr = format!("0.0.0.0:{}", config.metrics_port);
        let listener = TcpListener::bind(&addr)
            .await
            .wrap_err_with(|| format!("Failed to bind health server on {}", addr))?;
        let health_conn = retry(|| connect(&url))
            .await
            .wrap_err("Failed to connect to Redis for health checks")?;
        Some(HealthServer {
            listener,
            store: Arc::new(RedisQueueStore::new(health_conn)),
        })
    };

    let store: Arc<dyn QueueStore> = Arc::new(RedisQueueStore::new(redis));
    run_worker(
        store,
        &config.app,
        &config.notifications,
        health,
        shutdown_signal(),
    )
    .await?;

    info!("Notification worker service stopped");
    Ok(())
}
