use std::{env, time::Duration};

use moviesync_client::client::{DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};

use crate::repository::WritePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog API base URL (default: "https://api.themoviedb.org/3")
    pub api_url: String,
    /// Artwork host base URL (default: "https://image.tmdb.org/t/p")
    pub image_url: String,
    /// Catalog API key. Remote reads fail without it.
    pub api_key: Option<String>,
    /// Path to SQLite database file (default: "moviesync.db")
    pub db_path: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Partial write handling (default: best-effort)
    pub write_policy: WritePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MOVIESYNC_API_URL` - Catalog API base URL
    /// - `MOVIESYNC_IMAGE_URL` - Artwork host base URL
    /// - `MOVIESYNC_API_KEY` - Catalog API key (no default)
    /// - `MOVIESYNC_DB_PATH` - SQLite database path (default: "moviesync.db")
    /// - `MOVIESYNC_REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `MOVIESYNC_WRITE_POLICY` - `best-effort` or `compensate` (default: best-effort)
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("MOVIESYNC_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            image_url: env::var("MOVIESYNC_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
            api_key: env::var("MOVIESYNC_API_KEY").ok().filter(|key| !key.is_empty()),
            db_path: env::var("MOVIESYNC_DB_PATH").unwrap_or_else(|_| "moviesync.db".to_string()),
            request_timeout_seconds: env::var("MOVIESYNC_REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            write_policy: env::var("MOVIESYNC_WRITE_POLICY")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(policy) => Some(policy),
                    Err(err) => {
                        tracing::warn!(error = %err, "Ignoring MOVIESYNC_WRITE_POLICY");
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
