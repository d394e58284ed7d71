//! Application configuration loaded from environment variables.
//!
//! Credentials come from the environment (repo secrets in CI); everything
//! else has a default so a local run only needs the three Strava variables.

use std::env;
use std::path::PathBuf;

/// Challenge start: activities before this instant are never fetched.
pub const CHALLENGE_START_ISO: &str = "2024-12-07T00:00:00Z";

/// Default output directory for snapshot files, relative to the working dir.
pub const DEFAULT_DATA_DIR: &str = "data/activities";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token for the athlete account
    pub strava_refresh_token: String,
    /// Output directory for snapshot files
    pub data_dir: PathBuf,
    /// Challenge start timestamp (ISO 8601, UTC)
    pub challenge_start: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            challenge_start: CHALLENGE_START_ISO.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
                .into(),
            challenge_start: env::var("CHALLENGE_START")
                .unwrap_or_else(|_| CHALLENGE_START_ISO.to_string()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
