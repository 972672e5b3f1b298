//! Redis connector and health check
//!
//! The notification queue lives in a Redis list, so this is the only store
//! the library connects to.

mod config;
mod connector;
mod health;

pub use config::RedisConfig;
pub use connector::{
    connect, connect_for_blocking_reads, connect_from_config_with_retry, connect_with_retry,
};
pub use health::check_health;

// Re-export redis types for convenience
pub use redis::aio::ConnectionManager;
pub use redis::{AsyncCommands, Client, RedisResult};
