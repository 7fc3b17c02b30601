//! Configuration management for the Agro-Climate Advisory Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::EngineSettings;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Historical observation archive
    pub data_source: DataSourceConfig,

    /// Critical alert dispatch
    pub alerts: AlertConfig,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineSettings,
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
pub struct DataSourceConfig {
    /// Archive API endpoint (Open-Meteo archive compatible)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Fall back to the archive when the database has no history
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    /// Webhook receiving critical alerts as JSON
    pub webhook_url: Option<String>,

    pub enabled: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("data_source.base_url", "https://archive-api.open-meteo.com/v1")?
            .set_default("data_source.timeout_secs", 30)?
            .set_default("data_source.enabled", true)?
            .set_default("alerts.enabled", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/agroclimate".to_string(),
                max_connections: 10,
                min_connections: 2,
            },
            data_source: DataSourceConfig {
                base_url: "https://archive-api.open-meteo.com/v1".to_string(),
                timeout_secs: 30,
                enabled: false,
            },
            alerts: AlertConfig {
                webhook_url: None,
                enabled: true,
            },
            engine: EngineSettings::default(),
        }
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
