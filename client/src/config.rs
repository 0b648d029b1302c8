//! Configuration management for the inventory console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with INV__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use validator::Validate;

use crate::error::AppResult;

/// Main console configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Inventory API configuration
    #[validate]
    pub api: ApiConfig,

    /// Inventory table configuration
    #[validate]
    pub inventory: InventoryConfig,

    /// Session store configuration
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ApiConfig {
    /// Base URL of the REST backend, e.g. http://localhost:8080/api
    #[validate(url)]
    pub base_url: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct InventoryConfig {
    /// Rows per table page
    #[validate(range(min = 1, max = 500))]
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// JSON file holding the durable session keys
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let config = Self::builder()?.build()?.try_deserialize::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let environment = std::env::var("INV_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8080/api")?
            .set_default("api.timeout_secs", 30)?
            .set_default("inventory.page_size", shared::DEFAULT_PAGE_SIZE as i64)?
            .set_default("session.path", ".inventory-session.json")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INV__ prefix)
            .add_source(
                Environment::with_prefix("INV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            ))
    }
}
