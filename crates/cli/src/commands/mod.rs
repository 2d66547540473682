//! CLI command implementations.
//!
//! [`App`] is the composition root: every service is built once from the
//! environment and shares one profile store.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod currency;
pub mod notify;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use elite_cards_admin::auth::{AdminAuth, StaticCredentials};
use elite_cards_admin::config::AdminConfig;
use elite_cards_admin::dashboard::AdminDashboard;
use elite_cards_admin::records::PocketBaseClient;
use elite_cards_admin::services::email::{EmailJsClient, EmailNotifier, RelayError};
use elite_cards_core::EmailError;
use elite_cards_storefront::config::StorefrontConfig;
use elite_cards_storefront::{HttpStorefront, Storefront};

use crate::store::FileStore;

/// Shared profile store.
pub type Store = Arc<FileStore>;

/// Errors raised by the commands themselves.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not logged in. Run `elite-cli admin login <email> <password>` first")]
    NotLoggedIn,

    #[error("No storefront user signed in")]
    NoCurrentUser,

    #[error("Invalid email or password")]
    SignInFailed,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Amount {0} is too large to convert")]
    AmountOutOfRange(rust_decimal::Decimal),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Notification failed: {0}")]
    Notification(RelayError),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Every service the commands use.
pub struct App {
    pub shop: HttpStorefront<Store>,
    pub dashboard: AdminDashboard<Store, PocketBaseClient>,
    pub auth: AdminAuth<Store, StaticCredentials>,
    pub notifier: EmailNotifier<EmailJsClient>,
}

impl App {
    /// Build the services from the environment over the profile at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if either configuration cannot be loaded.
    pub fn from_env(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Store = Arc::new(FileStore::new(path));

        let storefront_config = StorefrontConfig::from_env()?;
        let admin_config = AdminConfig::from_env()?;
        tracing::debug!(
            store = %store.path().display(),
            backend = %admin_config.backend_url,
            "Services configured"
        );

        let records = PocketBaseClient::new(admin_config.backend_url.clone());

        Ok(Self {
            shop: Storefront::from_config(storefront_config, Arc::clone(&store)),
            dashboard: AdminDashboard::new(Arc::clone(&store), records),
            auth: AdminAuth::new(
                Arc::clone(&store),
                StaticCredentials::from(admin_config.credentials),
            ),
            notifier: EmailNotifier::new(EmailJsClient::new(), admin_config.email),
        })
    }
}
