#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

/// Default Redis URL for local development
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Redis connection settings
///
/// ```ignore
/// use database::redis::RedisConfig;
///
/// let config = RedisConfig::new("redis://127.0.0.1:6379");
/// let conn = database::redis::connect(config.url()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct RedisConfig {
    /// Redis connection URL, credentials and database index included
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REDIS_URL)
    }
}

/// Environment variables:
/// - `REDIS_URL`, falling back to `REDIS_HOST` (default `redis://localhost:6379`)
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());

        if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
            return Err(ConfigError::ParseError {
                key: "REDIS_URL".to_string(),
                details: format!("expected a redis:// or rediss:// URL, got '{}'", url),
            });
        }

        Ok(Self { url })
    }
}
