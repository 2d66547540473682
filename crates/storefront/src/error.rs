//! Storefront error types.
//!
//! Read paths in this crate fail soft (absent or malformed state becomes the
//! default), so these errors surface mainly from writes and catalog access.

use thiserror::Error;

use elite_cards_core::StoreError;

use crate::catalog::CatalogError;

/// Error type for storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Persisting state failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The catalog could not be fetched.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
