use serde::{de::DeserializeOwned, Deserialize};
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tracing::{debug, info};

use crate::services::THE_MEAL_DB_BASE_URL;


pub const ENV_PREFIX: &str = "RECIPESHOP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub meal_search: MealSearchConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_recipe_port")]
    pub recipe_port: u16,
    #[serde(default = "default_shop_port")]
    pub shop_port: u16,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealSearchConfig {
    #[serde(default = "default_meal_search_base_url")]
    pub meal_search_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load every section from `RECIPESHOP_*` environment variables and validate
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to read environment: {}", e),
            })?;

        Self::from_settings(&settings)
    }

    /// Build from an already assembled settings tree
    pub fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        let config = Config {
            server: ServerConfig::from_settings(settings)?,
            meal_search: MealSearchConfig::from_settings(settings)?,
            observability: ObservabilityConfig::from_settings(settings)?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.recipe_port == 0 || self.server.shop_port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server ports cannot be 0".to_string(),
            });
        }

        if self.server.recipe_port == self.server.shop_port {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Recipe and shop services cannot share port {}",
                    self.server.recipe_port
                ),
            });
        }

        if self.meal_search.meal_search_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Meal search base URL cannot be empty".to_string(),
            });
        }

        self.server.host.parse::<IpAddr>().map_err(|e| ConfigError::ValidationError {
            message: format!("Invalid host {}: {}", self.server.host, e),
        })?;

        Ok(())
    }
}

fn deserialize_section<T: DeserializeOwned>(
    settings: &config::Config,
    section: &str,
) -> Result<T, ConfigError> {
    settings
        .clone()
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })
}

impl ServerConfig {
    fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        deserialize_section(settings, "server")
    }

    pub fn recipe_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.socket_addr(self.recipe_port)
    }

    pub fn shop_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.socket_addr(self.shop_port)
    }

    fn socket_addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| ConfigError::ValidationError {
            message: format!("Invalid host {}: {}", self.host, e),
        })?;
        Ok(SocketAddr::new(ip, port))
    }
}

impl MealSearchConfig {
    fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        deserialize_section(settings, "meal search")
    }
}

impl ObservabilityConfig {
    fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        let mut config: Self = deserialize_section(settings, "observability")?;
        // An empty endpoint variable means export is off
        config.otlp_endpoint = config
            .otlp_endpoint
            .filter(|endpoint| !endpoint.trim().is_empty());
        Ok(config)
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_recipe_port() -> u16 {
    5000
}

pub(crate) fn default_shop_port() -> u16 {
    5001
}

pub(crate) fn default_max_request_size() -> u64 {
    1024 * 1024 // 1MB
}

pub(crate) fn default_meal_search_base_url() -> String {
    THE_MEAL_DB_BASE_URL.to_string()
}

pub(crate) fn default_service_name() -> String {
    "recipeshop-rs".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
