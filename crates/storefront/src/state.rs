//! Storefront service container.

use std::sync::Arc;

use tracing::instrument;

use elite_cards_core::{KeyValueStore, Product};

use crate::cart::CartManager;
use crate::catalog::{CatalogProvider, ShufflePolicy, StaticCatalog};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::pages::{FragmentSource, HttpFragmentSource, PageLoader};
use crate::services::account::AccountService;
use crate::services::payments::LocalPayments;
use crate::session::UserSession;

/// Storefront wired for the static catalog and HTTP page fragments.
pub type HttpStorefront<S> = Storefront<S, StaticCatalog, HttpFragmentSource>;

/// Every storefront service, built once and shared.
///
/// This struct is cheaply cloneable via `Arc`. The cart, the session and the
/// payments mirror share the same store.
pub struct Storefront<S, C, F> {
    inner: Arc<StorefrontInner<S, C, F>>,
}

impl<S, C, F> Clone for Storefront<S, C, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StorefrontInner<S, C, F> {
    config: StorefrontConfig,
    catalog: C,
    cart: CartManager<S, C>,
    session: UserSession<S>,
    account: AccountService,
    payments: LocalPayments<S>,
    pages: PageLoader<F>,
    listing_policy: ShufflePolicy,
}

impl<S, C, F> Storefront<S, C, F>
where
    S: KeyValueStore + Clone,
    C: CatalogProvider + Clone,
    F: FragmentSource,
{
    /// Create the storefront services.
    ///
    /// Listings are shuffled on every request when `config.shuffle_catalog`
    /// is set and kept in catalog order otherwise.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: S, catalog: C, fragments: F) -> Self {
        let listing_policy = if config.shuffle_catalog {
            ShufflePolicy::Shuffle
        } else {
            ShufflePolicy::Preserve
        };
        Self::with_listing_policy(config, store, catalog, fragments, listing_policy)
    }

    /// Create the storefront services with an explicit listing order.
    #[must_use]
    pub fn with_listing_policy(
        config: StorefrontConfig,
        store: S,
        catalog: C,
        fragments: F,
        listing_policy: ShufflePolicy,
    ) -> Self {
        let pages = PageLoader::new(fragments, config.fade_duration);
        Self {
            inner: Arc::new(StorefrontInner {
                cart: CartManager::new(store.clone(), catalog.clone()),
                session: UserSession::new(store.clone()),
                payments: LocalPayments::new(store),
                account: AccountService::new(),
                catalog,
                pages,
                listing_policy,
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn cart(&self) -> &CartManager<S, C> {
        &self.inner.cart
    }

    #[must_use]
    pub fn session(&self) -> &UserSession<S> {
        &self.inner.session
    }

    #[must_use]
    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }

    #[must_use]
    pub fn payments(&self) -> &LocalPayments<S> {
        &self.inner.payments
    }

    /// The catalog in source order.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.inner.catalog
    }

    #[must_use]
    pub fn pages(&self) -> &PageLoader<F> {
        &self.inner.pages
    }

    #[must_use]
    pub fn listing_policy(&self) -> ShufflePolicy {
        self.inner.listing_policy
    }

    /// The catalog as shown to shoppers, ordered by the listing policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let mut products = self.inner.catalog.get_products().await?;
        self.inner.listing_policy.apply(&mut products);
        Ok(products)
    }
}

impl<S: KeyValueStore + Clone> HttpStorefront<S> {
    /// Create a storefront over the sample catalog, fetching pages from
    /// `config.pages_base_url`.
    #[must_use]
    pub fn from_config(config: StorefrontConfig, store: S) -> Self {
        let fragments = HttpFragmentSource::new(config.pages_base_url.clone());
        Self::new(config, store, StaticCatalog::sample(), fragments)
    }
}
