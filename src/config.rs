//! Application configuration loaded from environment variables.
//!
//! Everything has a development default except nothing: the session core
//! must be bootable on a fresh checkout with zero configuration.

use std::env;
use std::path::PathBuf;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint of the backend API
    pub api_url: String,
    /// Email address that is always granted admin capability, independent
    /// of the role the backend reports
    pub admin_email: String,
    /// Path of the persisted session snapshot
    pub storage_path: PathBuf,
    /// Timeout for the identity verification call, in seconds
    pub check_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4000/graphql".to_string(),
            admin_email: "admin@skillsprint.com".to_string(),
            storage_path: PathBuf::from("auth-storage.json"),
            check_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_url: env::var("SKILLSPRINT_API_URL")
                .unwrap_or_else(|_| "http://localhost:4000/graphql".to_string()),
            admin_email: env::var("SKILLSPRINT_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@skillsprint.com".to_string()),
            storage_path: env::var("SKILLSPRINT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("auth-storage.json")),
            check_timeout_secs: env::var("SKILLSPRINT_CHECK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("SKILLSPRINT_CHECK_TIMEOUT_SECS"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
