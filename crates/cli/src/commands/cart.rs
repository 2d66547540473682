//! Cart commands.

use elite_cards_core::ProductId;
use elite_cards_storefront::Result;
use elite_cards_storefront::currency::{format_ghs, format_price, usd_to_ghs};

use super::App;

/// Print the cart joined with the catalog.
///
/// # Errors
///
/// Returns an error if the cart cannot be initialized or the catalog fetched.
#[allow(clippy::print_stdout)]
pub async fn show(app: &App) -> Result<()> {
    let cart = app.shop.cart();
    cart.initialize()?;

    let lines = cart.get_cart();
    if lines.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }

    let items = cart.line_items().await?;
    for item in &items {
        println!(
            "{} x{}  {}",
            item.title,
            item.quantity,
            format_price(item.line_total())
        );
    }

    let skipped = lines.len().saturating_sub(items.len());
    if skipped > 0 {
        println!("({skipped} unlisted item(s) not shown)");
    }
    println!("Items: {}", cart.get_cart_count());
    Ok(())
}

/// Add one unit of `id`.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
#[allow(clippy::print_stdout)]
pub fn add(app: &App, id: &str) -> Result<()> {
    let cart = app.shop.cart();
    cart.add_to_cart(&ProductId::new(id))?;
    println!("Added {id} ({} items in cart)", cart.get_cart_count());
    Ok(())
}

/// Remove the line for `id`.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
#[allow(clippy::print_stdout)]
pub fn remove(app: &App, id: &str) -> Result<()> {
    let cart = app.shop.cart();
    cart.remove_from_cart(&ProductId::new(id))?;
    println!("Removed {id} ({} items in cart)", cart.get_cart_count());
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
#[allow(clippy::print_stdout)]
pub fn clear(app: &App) -> Result<()> {
    app.shop.cart().clear_cart()?;
    println!("Cart cleared");
    Ok(())
}

/// Print the subtotal in dollars and cedis.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn subtotal(app: &App) -> Result<()> {
    let subtotal = app.shop.cart().get_cart_subtotal().await?;
    println!(
        "{}  ({})",
        format_price(subtotal),
        format_ghs(usd_to_ghs(subtotal))
    );
    Ok(())
}
