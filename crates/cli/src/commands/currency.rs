//! Currency commands.

use rust_decimal::Decimal;

use elite_cards_storefront::currency::{
    checked_usd_to_ghs, current_exchange_rate, fix_exchange_rate, format_ghs, format_price,
    update_exchange_rate,
};

use super::CliError;

/// # Errors
///
/// Returns `CliError::AmountOutOfRange` if the converted amount overflows.
#[allow(clippy::print_stdout)]
pub fn convert(usd: Decimal) -> Result<(), CliError> {
    let ghs = checked_usd_to_ghs(usd).ok_or(CliError::AmountOutOfRange(usd))?;
    println!("{} = {}", format_price(usd), format_ghs(ghs));
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn format(value: &str) {
    println!("{}", format_price(value));
}

#[allow(clippy::print_stdout)]
pub fn rate() {
    println!("1 USD = {} GHS", current_exchange_rate());
}

#[allow(clippy::print_stdout)]
pub fn set_rate(rate: Decimal) {
    let requested = update_exchange_rate(rate);
    println!(
        "Requested rate {requested} noted; the effective rate stays {}",
        fix_exchange_rate()
    );
}
