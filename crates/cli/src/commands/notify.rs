//! Checkout and transaction notification commands.

use chrono::{SecondsFormat, Utc};
use tracing::warn;

use elite_cards_admin::services::email::{NotificationOutcome, TransactionNotice};
use elite_cards_core::{CurrencyCode, Email, TransactionId};
use elite_cards_storefront::currency::{format_ghs, format_price, usd_to_ghs};
use elite_cards_storefront::services::account::PaymentSubmission;

use super::{App, CliError};

/// Build a notice for the current cart.
async fn notice_for_cart(
    app: &App,
    customer: &Email,
    payment_id: Option<String>,
) -> Result<TransactionNotice, Box<dyn std::error::Error>> {
    let cart = app.shop.cart();
    if cart.get_cart().is_empty() {
        return Err(CliError::EmptyCart.into());
    }

    Ok(TransactionNotice {
        customer_email: customer.to_string(),
        amount: cart.get_cart_subtotal().await?,
        payment_id,
        items: cart.line_items().await?,
    })
}

/// Send a transaction notification for the current cart.
///
/// # Errors
///
/// Returns an error if the email is invalid, the cart is empty, or the relay
/// reports a failure.
#[allow(clippy::print_stdout)]
pub async fn notify(
    app: &App,
    customer_email: &str,
    payment_id: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let customer = Email::parse(customer_email).map_err(CliError::from)?;
    let notice = notice_for_cart(app, &customer, payment_id).await?;

    match app.notifier.send_transaction_notification(&notice).await {
        NotificationOutcome::Sent(response) => {
            println!("Notification sent ({})", response.status);
            Ok(())
        }
        NotificationOutcome::Failed(e) => Err(CliError::Notification(e).into()),
    }
}

/// Submit the cart as a payment, notify the operator and empty the cart.
///
/// The backend does not record payments yet, so every submission lands in
/// the local payments mirror for the dashboard to review.
///
/// # Errors
///
/// Returns an error if the email is invalid, the cart is empty, or the
/// payment cannot be mirrored locally. A failed notification is only logged.
#[allow(clippy::print_stdout)]
pub async fn checkout(
    app: &App,
    customer_email: &str,
    screenshot: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let customer = Email::parse(customer_email).map_err(CliError::from)?;
    let notice = notice_for_cart(app, &customer, None).await?;

    let submission = PaymentSubmission {
        user_email: customer.to_string(),
        amount: notice.amount,
        currency: CurrencyCode::USD,
        amount_ghs: usd_to_ghs(notice.amount),
        submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        payment_screenshot: screenshot,
    };

    let receipt = app.shop.account().record_payment(&submission).await;
    let payment_id = if receipt.success {
        receipt.local_id
    } else {
        let index = app.shop.payments().append(&submission)?;
        TransactionId::local(index).into_inner()
    };

    let notice = TransactionNotice {
        payment_id: Some(payment_id.clone()),
        ..notice
    };
    if let NotificationOutcome::Failed(e) = app.notifier.send_transaction_notification(&notice).await {
        warn!(error = %e, payment_id = %payment_id, "Payment submitted without notification");
    }

    app.shop.cart().clear_cart()?;
    println!(
        "Payment {payment_id} submitted for review: {} ({})",
        format_price(submission.amount),
        format_ghs(submission.amount_ghs)
    );
    Ok(())
}
