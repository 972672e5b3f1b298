//! Database library providing connectors and utilities for the Redis-backed
//! notification queue.
//!
//! # Features
//!
//! - `redis` (default) - Redis connection management and health checks
//! - `config` - `core_config::FromEnv` support for [`redis::RedisConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::redis;
//! use redis::AsyncCommands;
//!
//! let mut conn = redis::connect("redis://127.0.0.1:6379").await?;
//! conn.rpush::<_, _, ()>("task_notifications", "{}").await?;
//! ```

pub mod common;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
