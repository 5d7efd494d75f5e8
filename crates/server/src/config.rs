//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARDFOLIO_MONGODB_URL` - MongoDB connection string (falls back to
//!   `MONGODB_URL` if unset)
//!
//! ## Optional
//! - `CARDFOLIO_DATABASE` - Logical database name (default: `pokemon_db`)
//! - `CARDFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `CARDFOLIO_PORT` - Listen port (default: 8080)
//! - `CARDFOLIO_INIT_DB` - Provision collections and indexes at startup
//!   (default: true)
//! - `CARDFOLIO_VERIFY_INDEXES` - Log an index report at startup
//!   (default: true)
//! - `CARDFOLIO_SEED_DATA` - Load the demo catalog at startup
//!   (default: false)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cardfolio server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// MongoDB connection URL (may contain credentials)
    pub mongodb_url: SecretString,
    /// Logical database holding both catalog collections
    pub database: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Provision collections and indexes at startup
    pub init_db: bool,
    /// Log an index report at startup
    pub verify_indexes: bool,
    /// Load the demo catalog at startup
    pub seed_data: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mongodb_url = get_mongodb_url("CARDFOLIO_MONGODB_URL")?;
        let database = get_env_or_default("CARDFOLIO_DATABASE", "pokemon_db");
        let host = get_env_or_default("CARDFOLIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARDFOLIO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CARDFOLIO_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARDFOLIO_PORT".to_string(), e.to_string()))?;
        let init_db = get_bool_or_default("CARDFOLIO_INIT_DB", true)?;
        let verify_indexes = get_bool_or_default("CARDFOLIO_VERIFY_INDEXES", true)?;
        let seed_data = get_bool_or_default("CARDFOLIO_SEED_DATA", false)?;

        Ok(Self {
            mongodb_url,
            database,
            host,
            port,
            init_db,
            verify_indexes,
            seed_data,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the MongoDB URL with fallback to generic `MONGODB_URL`.
fn get_mongodb_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("MONGODB_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
///
/// Accepts `true`/`false`/`1`/`0`, case-insensitive.
fn get_bool_or_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), value)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
