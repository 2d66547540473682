//! Storefront configuration loaded from environment variables.
//!
//! Every setting has a compiled-in default, so an empty environment yields a
//! working local configuration. The USD→GHS exchange rate is deliberately not
//! configurable here; see [`crate::currency::EXCHANGE_RATE`].
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ELITE_PAGES_BASE_URL` - Base URL page fragments are fetched from
//!   (default: `http://localhost:8080/`)
//! - `ELITE_FADE_MS` - Fade-out delay before a page swap in milliseconds
//!   (default: 300)
//! - `ELITE_SHUFFLE_CATALOG` - Shuffle the catalog listing on every request
//!   (default: true)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PAGES_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_FADE_MS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL that relative page fragment paths are resolved against
    pub pages_base_url: Url,
    /// How long the container stays faded out before new content is injected
    pub fade_duration: Duration,
    /// Whether catalog listings are reshuffled per request
    pub shuffle_catalog: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            pages_base_url: default_pages_base_url(),
            fade_duration: Duration::from_millis(DEFAULT_FADE_MS),
            shuffle_catalog: true,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let pages_base_url = match get_optional_env("ELITE_PAGES_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("ELITE_PAGES_BASE_URL".to_string(), e.to_string())
            })?,
            None => default_pages_base_url(),
        };

        let fade_ms = get_env_or_default("ELITE_FADE_MS", &DEFAULT_FADE_MS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("ELITE_FADE_MS".to_string(), e.to_string()))?;

        let shuffle_catalog = get_env_or_default("ELITE_SHUFFLE_CATALOG", "true")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ELITE_SHUFFLE_CATALOG".to_string(), e.to_string())
            })?;

        Ok(Self {
            pages_base_url,
            fade_duration: Duration::from_millis(fade_ms),
            shuffle_catalog,
        })
    }
}

#[allow(clippy::expect_used)]
fn default_pages_base_url() -> Url {
    Url::parse(DEFAULT_PAGES_BASE_URL).expect("default pages base URL is valid")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
