//! Storefront user commands.

use elite_cards_storefront::currency::format_price;

use super::{App, CliError};

/// Sign a storefront user in through the backend.
///
/// # Errors
///
/// Returns `CliError::SignInFailed` if the backend does not accept the pair.
#[allow(clippy::print_stdout)]
pub async fn login(app: &App, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(user) = app.shop.account().authenticate_user(email, password).await else {
        return Err(CliError::SignInFailed.into());
    };

    app.shop.session().set_current_user(Some(&user))?;
    println!("Signed in as {}", user.email);
    Ok(())
}

/// Sign the storefront user out.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
#[allow(clippy::print_stdout)]
pub fn logout(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    app.shop.session().set_current_user(None)?;
    println!("Signed out");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(app: &App) {
    match app.shop.session().current_user() {
        Some(user) if user.name.is_empty() => println!("{}", user.email),
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in"),
    }
}

/// Print recent orders of the signed-in user.
///
/// # Errors
///
/// Returns `CliError::NoCurrentUser` if nobody is signed in.
#[allow(clippy::print_stdout)]
pub async fn orders(app: &App) -> Result<(), CliError> {
    let user = app.shop.session().current_user().ok_or(CliError::NoCurrentUser)?;
    let orders = app.shop.account().recent_orders(&user.email).await;

    if orders.is_empty() {
        println!("No orders");
    }
    for order in &orders {
        println!("{}  {}  {}", order.id, format_price(order.amount), order.status);
    }
    Ok(())
}

/// Run the backend diagnostics and print their JSON results.
#[allow(clippy::print_stdout)]
pub async fn check(app: &App) {
    let account = app.shop.account();
    let connection = account.test_backend_connection().await;
    let submission = account.test_payment_submission().await;

    for (name, result) in [("connection", connection), ("payment submission", submission)] {
        let body = serde_json::to_string(&result).unwrap_or_else(|e| e.to_string());
        println!("{name}: {body}");
    }
}
