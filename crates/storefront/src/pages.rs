//! Page fragment loader.
//!
//! Fetches HTML fragments and swaps them into a container. Fragments are
//! cached by URL for the lifetime of the loader (`moka`, no expiry). A
//! replacing load fades the container out for a fixed delay, clears it,
//! injects the new fragment and fades back in; an appending load injects
//! straight away.
//!
//! Failures are purely presentational: the container shows an inline error
//! message and the caller gets `None`.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Named storefront pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Products,
    Dashboard,
    Cart,
    Modals,
}

impl Page {
    /// Fragment path relative to the pages base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "pages/home.html",
            Self::Products => "pages/products.html",
            Self::Dashboard => "pages/dashboard.html",
            Self::Cart => "pages/cart.html",
            Self::Modals => "pages/modals.html",
        }
    }
}

/// Errors that can occur while fetching a fragment.
#[derive(Debug, Error)]
pub enum PageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    /// The fragment path could not be resolved against the base URL.
    #[error("invalid page URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
}

/// Where fragment text comes from.
pub trait FragmentSource: Send + Sync {
    /// Fetch the fragment at `url` as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, PageError>> + Send;
}

/// Fetches fragments over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFragmentSource {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        let full_url = self
            .base_url
            .join(url)
            .map_err(|e| PageError::InvalidUrl(url.to_string(), e))?;

        let response = self.client.get(full_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Rendering state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerState {
    /// Fully rendered and visible.
    #[default]
    Stable,
    /// Faded out while its content is swapped.
    Transitioning,
}

/// A content container and its rendering state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    html: String,
    state: ContainerState,
}

impl Container {
    /// Current markup.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub const fn state(&self) -> ContainerState {
        self.state
    }
}

/// Loads page fragments into the main container and the modal container.
pub struct PageLoader<F> {
    source: F,
    cache: Cache<String, String>,
    container: Mutex<Container>,
    modals: Mutex<Option<Container>>,
    fade: Duration,
}

impl<F: FragmentSource> PageLoader<F> {
    /// Create a loader that fades for `fade` before each replacing load.
    #[must_use]
    pub fn new(source: F, fade: Duration) -> Self {
        Self {
            source,
            cache: Cache::builder().build(),
            container: Mutex::new(Container::default()),
            modals: Mutex::new(None),
            fade,
        }
    }

    /// Load a fragment into the main container.
    ///
    /// Returns the container markup after the load, or `None` if the
    /// fragment could not be fetched (the container then shows an inline
    /// error message).
    #[instrument(skip(self))]
    pub async fn load_page(&self, url: &str, append: bool) -> Option<String> {
        match self.try_load(url, append).await {
            Ok(html) => Some(html),
            Err(e) => {
                error!(error = %e, url = %url, "Error loading page");
                let mut container = self.container.lock().await;
                container.html = format!(r#"<div class="error-message">Failed to load page: {e}</div>"#);
                container.state = ContainerState::Stable;
                None
            }
        }
    }

    /// Load one of the named pages, replacing the current content.
    pub async fn show(&self, page: Page) -> Option<String> {
        self.load_page(page.path(), false).await
    }

    /// Set up the page system: modals go to their own container, then the
    /// home page is shown.
    ///
    /// The modal container is only populated once; later calls reuse it.
    pub async fn init(&self) -> Option<String> {
        {
            let mut modals = self.modals.lock().await;
            if modals.is_none() {
                match self.fragment(Page::Modals.path()).await {
                    Ok(html) => {
                        *modals = Some(Container {
                            html,
                            state: ContainerState::Stable,
                        });
                    }
                    Err(e) => error!(error = %e, "Error loading modals"),
                }
            }
        }

        let home = self.show(Page::Home).await;
        info!("Pages initialized");
        home
    }

    /// Snapshot of the main container.
    pub async fn container(&self) -> Container {
        self.container.lock().await.clone()
    }

    /// Snapshot of the modal container, if it has been created.
    pub async fn modal_container(&self) -> Option<Container> {
        self.modals.lock().await.clone()
    }

    async fn try_load(&self, url: &str, append: bool) -> Result<String, PageError> {
        let fragment = self.fragment(url).await?;

        if !append {
            self.container.lock().await.state = ContainerState::Transitioning;
            tokio::time::sleep(self.fade).await;
            self.container.lock().await.html.clear();
        }

        let mut container = self.container.lock().await;
        container.html.push_str(&fragment);
        container.state = ContainerState::Stable;
        Ok(container.html.clone())
    }

    /// Cache-first fragment fetch.
    async fn fragment(&self, url: &str) -> Result<String, PageError> {
        if let Some(cached) = self.cache.get(url).await {
            debug!(url = %url, "Page cache hit");
            return Ok(cached);
        }

        let text = self.source.fetch(url).await?;
        self.cache.insert(url.to_string(), text.clone()).await;
        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl FakeSource {
        fn with(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl FragmentSource for Arc<FakeSource> {
        async fn fetch(&self, url: &str) -> Result<String, PageError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().ok_or_else(|| PageError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn loader(source: &Arc<FakeSource>) -> PageLoader<Arc<FakeSource>> {
        PageLoader::new(Arc::clone(source), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_replace_swaps_content() {
        let source = Arc::new(FakeSource::with(&[
            ("pages/home.html", "<h1>Home</h1>"),
            ("pages/cart.html", "<h1>Cart</h1>"),
        ]));
        let pages = loader(&source);

        assert_eq!(pages.show(Page::Home).await.as_deref(), Some("<h1>Home</h1>"));
        assert_eq!(pages.show(Page::Cart).await.as_deref(), Some("<h1>Cart</h1>"));
        assert_eq!(pages.container().await.state(), ContainerState::Stable);
    }

    #[tokio::test]
    async fn test_append_keeps_existing_content() {
        let source = Arc::new(FakeSource::with(&[
            ("pages/home.html", "<h1>Home</h1>"),
            ("pages/products.html", "<ul></ul>"),
        ]));
        let pages = loader(&source);

        pages.show(Page::Home).await.unwrap();
        let html = pages.load_page("pages/products.html", true).await.unwrap();
        assert_eq!(html, "<h1>Home</h1><ul></ul>");
    }

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() {
        let source = Arc::new(FakeSource::with(&[("pages/home.html", "<h1>Home</h1>")]));
        let pages = loader(&source);

        pages.show(Page::Home).await.unwrap();
        pages.show(Page::Home).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_never_evicts() {
        let source = Arc::new(FakeSource {
            pages: (0..200)
                .map(|i| (format!("pages/p{i}.html"), format!("<p>{i}</p>")))
                .collect(),
            fetches: AtomicUsize::new(0),
        });
        let pages = loader(&source);

        for _ in 0..2 {
            for i in 0..200 {
                let html = pages.fragment(&format!("pages/p{i}.html")).await.unwrap();
                assert_eq!(html, format!("<p>{i}</p>"));
            }
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 200);
    }

    #[tokio::test]
    async fn test_failure_renders_inline_error() {
        let source = Arc::new(FakeSource::default());
        let pages = loader(&source);

        assert!(pages.load_page("pages/missing.html", false).await.is_none());
        let container = pages.container().await;
        assert!(container.html().starts_with(r#"<div class="error-message">Failed to load page: "#));
        assert!(container.html().contains("pages/missing.html returned 404"));
        assert_eq!(container.state(), ContainerState::Stable);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = Arc::new(FakeSource::default());
        let pages = loader(&source);

        pages.load_page("pages/missing.html", false).await;
        pages.load_page("pages/missing.html", false).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_init_moves_modals_to_their_own_container() {
        let source = Arc::new(FakeSource::with(&[
            ("pages/modals.html", r#"<div class="modal-overlay"></div>"#),
            ("pages/home.html", "<h1>Home</h1>"),
        ]));
        let pages = loader(&source);

        assert_eq!(pages.init().await.as_deref(), Some("<h1>Home</h1>"));
        let modals = pages.modal_container().await.unwrap();
        assert_eq!(modals.html(), r#"<div class="modal-overlay"></div>"#);

        pages.init().await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }
}
