// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of retries after a failed tip fetch.
pub const DEFAULT_FETCH_RETRIES: u32 = 1;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tips API (no trailing slash)
    pub api_url: String,
    /// Location of the durable session store
    pub store_path: PathBuf,
    /// Secret used to seal values in the session store
    pub store_secret: Vec<u8>,
    /// Retries after the first failed tip fetch
    pub fetch_retries: u32,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Minutes east of UTC used for "today" and date bucketing
    pub utc_offset_minutes: i32,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".to_string(),
            store_path: env::temp_dir().join("tipfeed-test-session.json"),
            store_secret: b"test_store_secret_32_bytes_min!!".to_vec(),
            fetch_retries: DEFAULT_FETCH_RETRIES,
            request_timeout: Duration::from_secs(5),
            utc_offset_minutes: 0,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_url: env::var("TIPFEED_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            store_path: env::var("TIPFEED_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tipfeed-session.json")),
            store_secret: env::var("TIPFEED_STORE_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TIPFEED_STORE_SECRET"))?
                .into_bytes(),
            fetch_retries: parse_var("TIPFEED_FETCH_RETRIES")?.unwrap_or(DEFAULT_FETCH_RETRIES),
            request_timeout: Duration::from_secs(
                parse_var("TIPFEED_REQUEST_TIMEOUT_SECS")?.unwrap_or(30),
            ),
            utc_offset_minutes: parse_var("TIPFEED_UTC_OFFSET_MINUTES")?.unwrap_or(0),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
