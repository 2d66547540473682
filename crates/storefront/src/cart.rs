//! Cart manager.
//!
//! The cart is an ordered list of `{id, quantity}` lines persisted as one JSON
//! array under the `cart` key. Every mutation reads the whole cart, changes it
//! and writes it back, so a read straight after a mutation always reflects
//! it. There is no versioning: concurrent writers race and the last one wins.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use elite_cards_core::store::keys;
use elite_cards_core::{CartLine, KeyValueStore, LineItem, ProductId};

use crate::catalog::{CatalogProvider, find_product};
use crate::error::Result;

/// Cart operations over a key-value store and a catalog.
#[derive(Debug, Clone)]
pub struct CartManager<S, C> {
    store: S,
    catalog: C,
}

impl<S: KeyValueStore, C: CatalogProvider> CartManager<S, C> {
    /// Create a cart manager.
    #[must_use]
    pub const fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Write an empty cart if none has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn initialize(&self) -> Result<()> {
        if self.store.get(keys::CART)?.is_none() {
            self.persist(&[])?;
        }
        Ok(())
    }

    /// The persisted cart, or an empty one.
    ///
    /// A read failure or malformed JSON is logged and treated as empty.
    #[must_use]
    pub fn get_cart(&self) -> Vec<CartLine> {
        match self.store.get_json::<Vec<CartLine>>(keys::CART) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Unreadable cart, treating as empty");
                Vec::new()
            }
        }
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn get_cart_count(&self) -> u32 {
        self.get_cart()
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Add one unit of `product_id`.
    ///
    /// Increments the existing line or appends a new one. The id is not
    /// checked against the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_to_cart(&self, product_id: &ProductId) -> Result<()> {
        let mut cart = self.get_cart();
        match cart.iter_mut().find(|line| &line.id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => cart.push(CartLine::single(product_id.clone())),
        }
        debug!(product_id = %product_id, lines = cart.len(), "Added to cart");
        self.persist(&cart)
    }

    /// Drop every line for `product_id`, whatever its quantity.
    ///
    /// Removing an id that is not in the cart still rewrites the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&self, product_id: &ProductId) -> Result<()> {
        let mut cart = self.get_cart();
        cart.retain(|line| &line.id != product_id);
        debug!(product_id = %product_id, lines = cart.len(), "Removed from cart");
        self.persist(&cart)
    }

    /// Replace the cart with an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear_cart(&self) -> Result<()> {
        self.persist(&[])
    }

    /// Subtotal in US dollars against a freshly fetched catalog.
    ///
    /// Lines whose product is no longer listed contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    #[instrument(skip(self))]
    pub async fn get_cart_subtotal(&self) -> Result<Decimal> {
        let cart = self.get_cart();
        let products = self.catalog.get_products().await?;

        let subtotal = cart.iter().fold(Decimal::ZERO, |subtotal, line| {
            find_product(&products, &line.id).map_or(subtotal, |product| {
                subtotal.saturating_add(product.price.saturating_mul(Decimal::from(line.quantity)))
            })
        });

        Ok(subtotal)
    }

    /// The cart joined with the catalog, in cart order.
    ///
    /// Lines whose product is no longer listed are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched.
    #[instrument(skip(self))]
    pub async fn line_items(&self) -> Result<Vec<LineItem>> {
        let cart = self.get_cart();
        let products = self.catalog.get_products().await?;

        Ok(cart
            .iter()
            .filter_map(|line| {
                let product = find_product(&products, &line.id);
                if product.is_none() {
                    debug!(product_id = %line.id, "Skipping cart line for unlisted product");
                }
                product.map(|product| LineItem {
                    title: product.title.clone(),
                    quantity: line.quantity,
                    unit_price: product.price,
                })
            })
            .collect())
    }

    fn persist(&self, cart: &[CartLine]) -> Result<()> {
        self.store.set_json(keys::CART, cart)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use elite_cards_core::MemoryStore;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::catalog::StaticCatalog;

    fn manager() -> CartManager<MemoryStore, StaticCatalog> {
        CartManager::new(MemoryStore::new(), StaticCatalog::sample())
    }

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw)
    }

    #[test]
    fn test_empty_cart_when_absent() {
        let cart = manager();
        assert!(cart.get_cart().is_empty());
        assert_eq!(cart.get_cart_count(), 0);
    }

    #[test]
    fn test_add_accumulates_quantity() {
        let cart = manager();
        cart.add_to_cart(&id("card-1")).unwrap();
        cart.add_to_cart(&id("card-2")).unwrap();
        cart.add_to_cart(&id("card-1")).unwrap();

        let lines = cart.get_cart();
        assert_eq!(
            lines,
            vec![
                CartLine {
                    id: id("card-1"),
                    quantity: 2
                },
                CartLine {
                    id: id("card-2"),
                    quantity: 1
                },
            ]
        );
        assert_eq!(cart.get_cart_count(), 3);
    }

    #[test]
    fn test_remove_drops_whole_line() {
        let cart = manager();
        cart.add_to_cart(&id("card-4")).unwrap();
        cart.add_to_cart(&id("card-4")).unwrap();
        cart.remove_from_cart(&id("card-4")).unwrap();
        assert!(cart.get_cart().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cart = manager();
        cart.add_to_cart(&id("card-4")).unwrap();
        cart.remove_from_cart(&id("card-9")).unwrap();
        assert_eq!(cart.get_cart_count(), 1);
    }

    #[test]
    fn test_clear_cart() {
        let cart = manager();
        cart.add_to_cart(&id("card-4")).unwrap();
        cart.clear_cart().unwrap();
        assert!(cart.get_cart().is_empty());
        assert_eq!(cart.store.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_malformed_cart_reads_as_empty() {
        let cart = CartManager::new(
            MemoryStore::with_entries([(keys::CART, "not json")]),
            StaticCatalog::sample(),
        );
        assert!(cart.get_cart().is_empty());

        // The next mutation overwrites the malformed value.
        cart.add_to_cart(&id("card-1")).unwrap();
        assert_eq!(cart.get_cart_count(), 1);
    }

    #[test]
    fn test_reads_browser_written_cart() {
        let cart = CartManager::new(
            MemoryStore::with_entries([(
                keys::CART,
                r#"[{"id":"card-3","quantity":2},{"id":"card-8","quantity":1}]"#,
            )]),
            StaticCatalog::sample(),
        );
        assert_eq!(cart.get_cart_count(), 3);
    }

    #[test]
    fn test_initialize_does_not_overwrite() {
        let cart = manager();
        cart.initialize().unwrap();
        assert_eq!(cart.store.get(keys::CART).unwrap().as_deref(), Some("[]"));

        cart.add_to_cart(&id("card-1")).unwrap();
        cart.initialize().unwrap();
        assert_eq!(cart.get_cart_count(), 1);
    }

    #[tokio::test]
    async fn test_subtotal() {
        let cart = manager();
        // card-1 = $35, card-4 = $200
        cart.add_to_cart(&id("card-1")).unwrap();
        cart.add_to_cart(&id("card-1")).unwrap();
        cart.add_to_cart(&id("card-4")).unwrap();
        assert_eq!(cart.get_cart_subtotal().await.unwrap(), Decimal::from(270));
    }

    #[tokio::test]
    async fn test_subtotal_ignores_dangling_lines() {
        let cart = manager();
        cart.add_to_cart(&id("card-2")).unwrap();
        cart.add_to_cart(&id("gold-card-1")).unwrap();
        assert_eq!(cart.get_cart_subtotal().await.unwrap(), Decimal::from(50));
    }

    #[tokio::test]
    async fn test_subtotal_of_empty_cart_is_zero() {
        assert_eq!(manager().get_cart_subtotal().await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_line_items_skip_dangling() {
        let cart = manager();
        cart.add_to_cart(&id("removed-card")).unwrap();
        cart.add_to_cart(&id("card-6")).unwrap();
        cart.add_to_cart(&id("card-6")).unwrap();

        let items = cart.line_items().await.unwrap();
        assert_eq!(items.len(), 1);
        let item = items.first().unwrap();
        assert_eq!(item.title, "Gold Mastercard");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total(), Decimal::from(100));
    }

    #[tokio::test]
    async fn test_random_operations_match_model() {
        let cart = manager();
        let products = StaticCatalog::sample().get_products().await.unwrap();
        let ids: Vec<ProductId> = ["card-1", "card-2", "card-7", "card-20", "gold-card-1"]
            .into_iter()
            .map(id)
            .collect();

        let mut rng = StdRng::seed_from_u64(0x00E1_17EC);
        let mut model: Vec<(ProductId, u32)> = Vec::new();

        for step in 0..500 {
            let product = ids.get(rng.random_range(0..ids.len())).unwrap();
            match rng.random_range(0..10) {
                0..=5 => {
                    cart.add_to_cart(product).unwrap();
                    match model.iter_mut().find(|(id, _)| id == product) {
                        Some((_, quantity)) => *quantity += 1,
                        None => model.push((product.clone(), 1)),
                    }
                }
                6..=8 => {
                    cart.remove_from_cart(product).unwrap();
                    model.retain(|(id, _)| id != product);
                }
                _ => {
                    cart.clear_cart().unwrap();
                    model.clear();
                }
            }

            let expected: Vec<CartLine> = model
                .iter()
                .map(|(id, quantity)| CartLine {
                    id: id.clone(),
                    quantity: *quantity,
                })
                .collect();
            let lines = cart.get_cart();
            let distinct: HashSet<&ProductId> = lines.iter().map(|line| &line.id).collect();
            assert_eq!(distinct.len(), lines.len(), "step {step}");
            assert_eq!(lines, expected, "step {step}");
            assert_eq!(
                cart.get_cart_count(),
                model.iter().map(|(_, quantity)| quantity).sum::<u32>(),
                "step {step}"
            );
        }

        let expected_subtotal = model
            .iter()
            .filter_map(|(id, quantity)| {
                find_product(&products, id).map(|product| product.price * Decimal::from(*quantity))
            })
            .sum::<Decimal>();
        assert_eq!(cart.get_cart_subtotal().await.unwrap(), expected_subtotal);
    }

    #[tokio::test]
    async fn test_subtotal_saturates() {
        let products = vec![elite_cards_core::Product {
            id: id("card-1"),
            price: Decimal::MAX,
            ..StaticCatalog::sample().get_products().await.unwrap().remove(0)
        }];
        let cart = CartManager::new(
            MemoryStore::with_entries([(keys::CART, r#"[{"id":"card-1","quantity":3}]"#)]),
            StaticCatalog::new(products),
        );
        assert_eq!(cart.get_cart_subtotal().await.unwrap(), Decimal::MAX);
    }
}
