// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every variant is fatal for the current run: the job logs the error to
//! stderr and exits non-zero. Nothing is retried.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Snapshot store error: {0}")]
    Store(String),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Sentinel message for a Strava 429 response.
    pub const STRAVA_RATE_LIMIT: &'static str = "rate_limit_exceeded";
    /// Sentinel message for a Strava 401 response.
    pub const STRAVA_TOKEN_ERROR: &'static str = "strava_token_invalid";

    /// True when the error indicates a rejected or expired Strava token.
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg.contains(Self::STRAVA_TOKEN_ERROR))
    }
}

/// Result type alias for the sync pipeline
pub type Result<T> = std::result::Result<T, AppError>;
