//! Catalog provider.
//!
//! The catalog is small (tens of items) and always scanned in full; lookups
//! by id are linear. Listing order is controlled by an explicit
//! [`ShufflePolicy`] applied by the caller, so fetching never introduces
//! randomness on its own.

use std::future::Future;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use thiserror::Error;

use elite_cards_core::{Product, ProductId};

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog source could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of the purchasable products.
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full catalog in source order.
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// How a catalog listing is ordered before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShufflePolicy {
    /// Keep source order.
    #[default]
    Preserve,
    /// Reshuffle with fresh randomness on every listing.
    Shuffle,
    /// Reshuffle deterministically from a seed.
    Seeded(u64),
}

impl ShufflePolicy {
    /// Reorder `products` in place according to the policy.
    pub fn apply(self, products: &mut [Product]) {
        match self {
            Self::Preserve => {}
            Self::Shuffle => products.shuffle(&mut rand::rng()),
            Self::Seeded(seed) => products.shuffle(&mut StdRng::seed_from_u64(seed)),
        }
    }
}

/// Find a product by id with a linear scan.
#[must_use]
pub fn find_product<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|product| &product.id == id)
}

/// In-memory catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Arc<[Product]>,
}

impl StaticCatalog {
    /// Create a catalog over the given products.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// The built-in sample catalog of twenty cards.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(sample_products())
    }

    /// Number of listed products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if nothing is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogProvider for StaticCatalog {
    async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.to_vec())
    }
}

// =============================================================================
// Sample Data
// =============================================================================

const MASKED_NUMBER: &str = "**** **** **** ****";

/// `(title, limit label, price in dollars, image)` for `card-1` .. `card-20`.
const SAMPLE_CARDS: [(&str, &str, i64, &str); 20] = [
    ("Basic Mastercard", "$2,000", 35, "Visa Infinite.jpeg"),
    ("Standard Mastercard", "$3,000", 50, "American Express.png"),
    ("Premium Mastercard", "$5,000", 100, "Platinum Mastercard.jpeg"),
    ("Executive Mastercard", "$8,000", 200, "American Express.png"),
    ("Essential Mastercard", "$2,000", 35, "Platinum Mastercard.jpeg"),
    ("Gold Mastercard", "$3,000", 50, "Visa Infinite.jpeg"),
    ("Elite Mastercard", "$5,000", 100, "American Express.png"),
    ("Platinum Mastercard", "$8,000", 200, "Platinum Mastercard.jpeg"),
    ("Starter Mastercard", "$2,000", 35, "American Express.png"),
    ("Plus Mastercard", "$3,000", 50, "Platinum Mastercard.jpeg"),
    ("Advanced Mastercard", "$5,000", 100, "Visa Infinite.jpeg"),
    ("Supreme Mastercard", "$8,000", 200, "American Express.png"),
    ("Entry Mastercard", "$2,000", 35, "Visa Infinite.jpeg"),
    ("Enhanced Mastercard", "$3,000", 50, "American Express.png"),
    ("Pro Mastercard", "$5,000", 100, "Platinum Mastercard.jpeg"),
    ("Ultimate Mastercard", "$8,000", 200, "Visa Infinite.jpeg"),
    ("Simple Mastercard", "$2,000", 35, "American Express.png"),
    ("Select Mastercard", "$3,000", 50, "Platinum Mastercard.jpeg"),
    ("Master Mastercard", "$5,000", 100, "American Express.png"),
    ("Legendary Mastercard", "$8,000", 200, "Visa Infinite.jpeg"),
];

fn sample_products() -> Vec<Product> {
    SAMPLE_CARDS
        .iter()
        .enumerate()
        .map(|(index, &(title, limit, dollars, image))| Product {
            id: ProductId::new(format!("card-{}", index + 1)),
            title: title.to_string(),
            price: Decimal::from(dollars),
            image: image.to_string(),
            number: Some(MASKED_NUMBER.to_string()),
            limit: Some(limit.to_string()),
        })
        .collect()
}
