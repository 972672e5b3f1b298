use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::redis::RedisConfig;
use domain_notifications::NotificationQueue;
use queue_worker::QueueDef;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub redis: RedisConfig,
    /// Queue the due-soon notifications are appended to
    pub queue_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3000 by default
        let redis = RedisConfig::from_env()?;
        let queue_name = env_or_default("QUEUE_NAME", NotificationQueue::QUEUE_NAME);

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            redis,
            queue_name,
        })
    }
}
