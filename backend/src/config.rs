//! Configuration management for the Cocoon Price Advisor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CPA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration (history persistence)
    pub database: DatabaseConfig,

    /// JWT identity configuration
    pub jwt: JwtConfig,

    /// Weather history and model artifact locations
    pub data: DataConfig,

    /// Recommendation tuning
    pub recommendation: RecommendationConfig,
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
    /// PostgreSQL connection URL. History is disabled when unset.
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret the identity provider signs tokens with (HS256)
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the per-location weather CSV files
    pub weather_dir: PathBuf,

    /// Weather file name per location display name
    pub weather_files: BTreeMap<String, String>,

    /// Path of the JSON model artifact
    pub model_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationConfig {
    /// Number of forward-looking start dates evaluated per request
    pub horizon: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CPA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("data.weather_dir", "data")?
            .set_default("data.model_path", "data/model.json")?
            .set_default("data.weather_files.Bengaluru", "bengaluru_weather_data.csv")?
            .set_default("data.weather_files.Ramanagara", "ramanagar_weather_data.csv")?
            .set_default("data.weather_files.Shidlaghatta", "siddlaghatta_weather_data.csv")?
            .set_default("recommendation.horizon", i64::from(shared::DEFAULT_HORIZON))?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CPA_ prefix)
            .add_source(
                Environment::with_prefix("CPA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        shared::validate_horizon(self.recommendation.horizon)
            .map_err(|msg| ConfigError::Message(format!("recommendation.horizon: {}", msg)))?;

        if self.environment == "production" && self.jwt.secret == "development-secret-key" {
            return Err(ConfigError::Message(
                "jwt.secret must be set in production".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
