//! Configuration management for StockMaster Pro
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SMP_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use uuid::Uuid;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Warehouse preferences exposed through the settings endpoint
    pub app: AppConfig,

    /// Notification defaults exposed through the settings endpoint
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Display currency
    pub currency: String,

    /// Display timezone
    pub timezone: String,

    /// Display date format
    pub date_format: String,

    /// Location preselected on movement forms
    #[serde(default)]
    pub default_location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationsConfig {
    pub email_alerts: bool,
    pub push_notifications: bool,

    /// Fallback reorder threshold for products without one
    pub low_stock_threshold: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SMP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("app.currency", "USD")?
            .set_default("app.timezone", "UTC")?
            .set_default("app.date_format", "MM/DD/YYYY")?
            .set_default("notifications.email_alerts", true)?
            .set_default("notifications.push_notifications", false)?
            .set_default("notifications.low_stock_threshold", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SMP_ prefix)
            .add_source(
                Environment::with_prefix("SMP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
