//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cannot read filter registry {path:?}: {source}")]
    RegistryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse filter registry: {0}")]
    RegistryParse(#[from] serde_yaml::Error),

    #[error("Invalid filter registry: {0}")]
    RegistryInvalid(#[from] crate::domain::foundation::ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),

    #[error("Filter registry file not found: {0:?}")]
    RegistryFileNotFound(PathBuf),
}
