//! Admin configuration loaded from environment variables.
//!
//! Every value has a compiled-in default so the dashboard runs against a
//! local backend with no setup. The backend is picked from the host the
//! site is served on, the same way the browser build does it.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ELITE_SITE_HOST` - Host the site is served on, selects the backend
//!   (default: `localhost`)
//! - `ELITE_BACKEND_URL` - Record service base URL, overrides the backend
//!   picked from `ELITE_SITE_HOST` (must be `http` or `https`)
//! - `ELITE_ADMIN_EMAIL` - Operator login email (default: `admin@elitecards.com`)
//! - `ELITE_ADMIN_PASSWORD` - Operator login password (default: `admin123`)
//! - `EMAILJS_SERVICE_ID` - Mail relay service id
//! - `EMAILJS_TEMPLATE_ID` - Mail relay template id
//! - `EMAILJS_PUBLIC_KEY` - Mail relay public key
//! - `ELITE_NOTIFY_EMAIL` - Recipient of transaction notifications

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Backend used when the site runs on a development host.
pub const LOCAL_BACKEND_URL: &str = "http://localhost:8090";

/// Backend used everywhere else.
pub const REMOTE_BACKEND_URL: &str = "http://node68.lunes.host:3246";

/// Host substrings that select [`LOCAL_BACKEND_URL`].
const LOCAL_HOST_MARKERS: &[&str] = &["localhost", "127.0.0.1", "codespace"];

const DEFAULT_SITE_HOST: &str = "localhost";
const DEFAULT_ADMIN_EMAIL: &str = "admin@elitecards.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const DEFAULT_SERVICE_ID: &str = "service_ctpg96v";
const DEFAULT_TEMPLATE_ID: &str = "your_template_id_here";
const DEFAULT_PUBLIC_KEY: &str = "your_public_key_here";
const DEFAULT_NOTIFY_EMAIL: &str = "adomanuacquah.dev@gmail.com";
const NOTIFY_FROM_NAME: &str = "ElitCards System";
const NOTIFY_SUBJECT: &str = "New Transaction Notification - ElitCards";

/// Relay keys containing any of these (case-insensitive) were never filled in.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your_",
    "your-",
    "_here",
    "changeme",
    "replace",
    "placeholder",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Host the site is served on
    pub site_host: String,
    /// Record service base URL, derived from `site_host`
    pub backend_url: Url,
    /// Operator credentials
    pub credentials: AdminCredentials,
    /// Mail relay configuration
    pub email: EmailConfig,
}

/// The single operator credential pair.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

/// Mail relay (`EmailJS`) configuration.
///
/// Implements `Debug` manually to redact the public key.
#[derive(Clone)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: SecretString,
    /// Where notifications are delivered
    pub admin_email: String,
    pub from_name: String,
    pub subject: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"[REDACTED]")
            .field("admin_email", &self.admin_email)
            .field("from_name", &self.from_name)
            .field("subject", &self.subject)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: DEFAULT_SERVICE_ID.to_string(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            public_key: SecretString::from(DEFAULT_PUBLIC_KEY),
            admin_email: DEFAULT_NOTIFY_EMAIL.to_string(),
            from_name: NOTIFY_FROM_NAME.to_string(),
            subject: NOTIFY_SUBJECT.to_string(),
        }
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_id: get_env_or_default("EMAILJS_SERVICE_ID", &defaults.service_id),
            template_id: get_env_or_default("EMAILJS_TEMPLATE_ID", &defaults.template_id),
            public_key: get_optional_env("EMAILJS_PUBLIC_KEY")
                .map_or(defaults.public_key, SecretString::from),
            admin_email: get_env_or_default("ELITE_NOTIFY_EMAIL", &defaults.admin_email),
            ..defaults
        }
    }

    /// Returns `true` once the service id, template id and public key are all
    /// real values.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !is_placeholder(&self.service_id)
            && !is_placeholder(&self.template_id)
            && !is_placeholder(self.public_key.expose_secret())
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ELITE_BACKEND_URL` is set but is not an
    /// `http`/`https` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let site_host = get_env_or_default("ELITE_SITE_HOST", DEFAULT_SITE_HOST);
        let mut config = match get_optional_env("ELITE_BACKEND_URL") {
            Some(raw) => Self::for_backend(&site_host, &raw)?,
            None => Self::for_host(&site_host)?,
        };

        if let Some(email) = get_optional_env("ELITE_ADMIN_EMAIL") {
            config.credentials.email = email;
        }
        if let Some(password) = get_optional_env("ELITE_ADMIN_PASSWORD") {
            config.credentials.password = SecretString::from(password);
        }
        config.email = EmailConfig::from_env();

        Ok(config)
    }

    /// Default configuration for a site served on `site_host`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the built-in backend URL for the host does
    /// not parse.
    pub fn for_host(site_host: &str) -> Result<Self, ConfigError> {
        Self::for_backend(site_host, backend_url_for_host(site_host))
    }

    /// Default configuration talking to an explicit backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `backend_url` is not an `http`/`https` URL.
    pub fn for_backend(site_host: &str, backend_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            site_host: site_host.to_string(),
            backend_url: parse_backend_url(backend_url)?,
            credentials: AdminCredentials::default(),
            email: EmailConfig::default(),
        })
    }
}

fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("ELITE_BACKEND_URL".to_string(), reason);
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Pick the record service for a site host.
///
/// Development hosts (matched by case-insensitive substring) talk to the
/// local backend; anything else talks to the hosted one.
#[must_use]
pub fn backend_url_for_host(host: &str) -> &'static str {
    let host = host.to_lowercase();
    if LOCAL_HOST_MARKERS
        .iter()
        .any(|marker| host.contains(marker))
    {
        LOCAL_BACKEND_URL
    } else {
        REMOTE_BACKEND_URL
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.is_empty() || PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p))
}

// =============================================================================
// Helpers
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
