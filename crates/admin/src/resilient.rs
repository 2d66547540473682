//! Remote-first reads with a local fallback.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

use elite_cards_core::Provenance;

/// A value tagged with the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    #[must_use]
    pub const fn remote(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Remote,
        }
    }

    #[must_use]
    pub const fn fallback(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::LocalFallback,
        }
    }

    /// Returns `true` when the value came from the fallback source.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.provenance.is_fallback()
    }
}

/// When the fallback source replaces the remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Only when the remote read fails.
    OnError,
    /// When the remote read fails or returns nothing.
    OnErrorOrEmpty,
}

/// Read a list remotely, falling back to `fallback` according to `policy`.
///
/// The two sources are never merged. Remote failures are logged with
/// `label` and swallowed.
pub async fn resilient_fetch<T, E, Fut, F>(
    label: &str,
    remote: Fut,
    policy: FallbackPolicy,
    fallback: F,
) -> Sourced<Vec<T>>
where
    Fut: Future<Output = Result<Vec<T>, E>>,
    E: Display,
    F: FnOnce() -> Vec<T>,
{
    match remote.await {
        Ok(items) if items.is_empty() && policy == FallbackPolicy::OnErrorOrEmpty => {
            warn!(source = %label, "Remote returned nothing, using local fallback");
            Sourced::fallback(fallback())
        }
        Ok(items) => Sourced::remote(items),
        Err(e) => {
            warn!(source = %label, error = %e, "Remote unavailable, using local fallback");
            Sourced::fallback(fallback())
        }
    }
}
