//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product-id/quantity pair within a cart.
///
/// Serialized exactly as `{"id": "...", "quantity": n}` so carts written by
/// the browser storefront stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The referenced product. May dangle if the catalog changed.
    pub id: ProductId,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// A fresh line holding a single unit.
    #[must_use]
    pub const fn single(id: ProductId) -> Self {
        Self { id, quantity: 1 }
    }
}

/// A cart line joined with its catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    /// `unit_price × quantity`, saturating at the decimal bounds.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_wire_shape() {
        let line = CartLine::single(ProductId::new("card-1"));
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"id":"card-1","quantity":1}"#);
    }

    #[test]
    fn test_line_total() {
        let item = LineItem {
            title: "Gold Mastercard".to_string(),
            quantity: 3,
            unit_price: Decimal::new(5000, 2),
        };
        assert_eq!(item.line_total(), Decimal::from(150));

        let huge = LineItem {
            unit_price: Decimal::MAX,
            ..item
        };
        assert_eq!(huge.line_total(), Decimal::MAX);
    }
}
