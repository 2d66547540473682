//! Catalog commands.

use elite_cards_storefront::catalog::CatalogProvider;
use elite_cards_storefront::currency::format_price;

use super::App;

/// Print the catalog, shuffled per the storefront config unless `stable`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn list(app: &App, stable: bool) -> Result<(), Box<dyn std::error::Error>> {
    let products = if stable {
        app.shop.catalog().get_products().await?
    } else {
        app.shop.list_products().await?
    };

    for product in &products {
        println!(
            "{:<8} {:<24} {:>8}  limit {}",
            product.id.as_str(),
            product.title,
            format_price(product.price),
            product.limit.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
