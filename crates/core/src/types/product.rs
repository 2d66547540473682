//! Catalog product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A purchasable card listed in the catalog.
///
/// Products are immutable once listed. Within one catalog snapshot no two
/// products share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in US dollars.
    pub price: Decimal,
    /// Image file name or URL.
    pub image: String,
    /// Masked card number shown on the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Spending limit label (e.g. `$2,000`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl Product {
    /// The unit price as a USD [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}
