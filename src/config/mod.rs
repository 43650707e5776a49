//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEMBER_REGISTRY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use member_registry::config::AppConfig;
//!
//! # async fn run() -> Result<(), member_registry::config::ConfigError> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! let pool = config.database.connect().await?;
//! let registry = config.listing.load_registry()?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod listing;
mod logging;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use listing::{parse_registry, ListingConfig};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Filter registry source for the advanced listing
    #[serde(default)]
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBER_REGISTRY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEMBER_REGISTRY__DATABASE__URL=...` -> `database.url = ...`
    /// - `MEMBER_REGISTRY__LOGGING__JSON=true` -> `logging.json = true`
    /// - `MEMBER_REGISTRY__LISTING__REGISTRY_PATH=...` -> `listing.registry_path = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBER_REGISTRY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.logging.validate()?;
        self.listing.validate()?;
        Ok(())
    }
}
