use core_config::{AppInfo, ConfigError, Environment, FromEnv, app_info, env_parse};
use database::redis::RedisConfig;
use domain_notifications::NotificationWorkerConfig;

/// Default port of the health and metrics server
pub const DEFAULT_METRICS_PORT: u16 = 8082;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub redis: RedisConfig,
    pub notifications: NotificationWorkerConfig,
    /// `METRICS_PORT`; 0 disables the health and metrics server
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            redis: RedisConfig::from_env()?,
            notifications: NotificationWorkerConfig::from_env()?,
            metrics_port: env_parse("METRICS_PORT", DEFAULT_METRICS_PORT)?,
        })
    }
}
