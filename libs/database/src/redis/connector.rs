use std::time::Duration;

use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::info;

use super::RedisConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Headroom added on top of a server-side block timeout before the client
/// gives up on the response.
const BLOCKING_RESPONSE_MARGIN: Duration = Duration::from_secs(2);

/// Connect to Redis and return a ConnectionManager
///
/// The ConnectionManager reconnects on its own after connection failures.
/// The connection is verified with a `PING` before it is returned.
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    info!("Attempting to connect to Redis at {}", url);

    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;
    ping(manager).await
}

/// Connect with a response timeout long enough for blocking commands.
///
/// `BLPOP key <block_timeout>` legitimately keeps the connection silent for
/// the whole block timeout. The client-side response timeout must outlast it,
/// otherwise the client abandons a pop the server may still complete, and that
/// element is lost. Use one of these connections per blocking consumer; a
/// multiplexed connection serialises behind the blocked command.
pub async fn connect_for_blocking_reads(
    url: &str,
    block_timeout: Duration,
) -> redis::RedisResult<ConnectionManager> {
    info!(
        block_timeout_ms = block_timeout.as_millis() as u64,
        "Attempting to connect to Redis at {} for blocking reads", url
    );

    let client = Client::open(url)?;
    let config = ConnectionManagerConfig::new()
        .set_response_timeout(Some(block_timeout + BLOCKING_RESPONSE_MARGIN));
    let manager = ConnectionManager::new_with_config(client, config).await?;
    ping(manager).await
}

async fn ping(manager: ConnectionManager) -> redis::RedisResult<ConnectionManager> {
    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Successfully connected to Redis");
    Ok(manager)
}

/// Connect to Redis with automatic retry on failure
///
/// `None` uses the default [`RetryConfig`].
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    let url_owned = url.to_string();

    match retry_config {
        Some(config) => retry_with_backoff(|| connect(&url_owned), config).await,
        None => retry(|| connect(&url_owned)).await,
    }
}

/// Connect from config with automatic retry on failure
///
/// ```ignore
/// use database::redis::{RedisConfig, connect_from_config_with_retry};
/// use core_config::FromEnv;
///
/// let config = RedisConfig::from_env()?;
/// let conn = connect_from_config_with_retry(config, None).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    connect_with_retry(config.url(), retry_config).await
}
