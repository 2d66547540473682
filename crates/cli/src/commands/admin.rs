//! Operator dashboard commands.
//!
//! Everything except `login` requires a persisted operator session.

use std::path::PathBuf;

use rust_decimal::Decimal;

use elite_cards_admin::auth::AdminSession;
use elite_cards_admin::dashboard::NewCard;
use elite_cards_admin::records::FileUpload;
use elite_cards_core::{CardId, PaymentStatus, TransactionId};
use elite_cards_storefront::currency::{format_ghs, format_price};

use super::{App, CliError};

fn require_session(app: &App) -> Result<AdminSession, CliError> {
    app.auth.restore_session().ok_or(CliError::NotLoggedIn)
}

/// Start an operator session.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot be
/// stored.
#[allow(clippy::print_stdout)]
pub fn login(app: &App, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let session = app.auth.login(email, password)?;
    println!("Logged in as {} ({})", session.email, session.name);
    Ok(())
}

/// End the operator session.
///
/// # Errors
///
/// Returns an error if the session cannot be removed.
#[allow(clippy::print_stdout)]
pub fn logout(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    app.auth.logout()?;
    println!("Logged out");
    Ok(())
}

/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a session.
#[allow(clippy::print_stdout)]
pub async fn cards(app: &App) -> Result<(), CliError> {
    require_session(app)?;
    let cards = app.dashboard.get_cards().await;

    println!("Cards (source: {})", cards.provenance);
    if cards.value.is_empty() {
        println!("No cards found.");
    }
    for card in &cards.value {
        println!(
            "{}  {}  {}  {}\n    {}",
            card.id,
            card.name,
            format_price(card.price),
            app.dashboard.card_image_url(card),
            card.description
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a session.
#[allow(clippy::print_stdout)]
pub async fn transactions(app: &App) -> Result<(), CliError> {
    require_session(app)?;
    let transactions = app.dashboard.get_transactions().await;

    println!("Transactions (source: {})", transactions.provenance);
    if transactions.value.is_empty() {
        println!("No transactions found.");
    }
    for transaction in &transactions.value {
        println!(
            "{}  {}  {}  {}  {}  {}",
            transaction.id,
            transaction.user_email,
            format_price(transaction.amount),
            format_ghs(transaction.amount_ghs),
            transaction.status,
            transaction.submitted_at.as_deref().unwrap_or("-")
        );
        if let Some(screenshot) = &transaction.screenshot {
            println!("    screenshot: {screenshot}");
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a session.
#[allow(clippy::print_stdout)]
pub async fn stats(app: &App) -> Result<(), CliError> {
    require_session(app)?;
    let stats = app.dashboard.stats().await;

    println!("Total cards:          {} ({})", stats.total_cards, stats.cards_source);
    println!(
        "Total transactions:   {} ({})",
        stats.total_transactions, stats.transactions_source
    );
    println!("Pending transactions: {}", stats.pending_transactions);
    println!("Total revenue:        {}", stats.revenue_display());
    Ok(())
}

/// # Errors
///
/// Returns an error without a session or if the update fails.
#[allow(clippy::print_stdout)]
pub async fn set_status(
    app: &App,
    id: &str,
    status: PaymentStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(app)?;
    app.dashboard
        .update_transaction_status(&TransactionId::new(id), status)
        .await?;
    println!("Transaction {id} marked {status}");
    Ok(())
}

/// # Errors
///
/// Returns an error without a session or if the image cannot be read.
#[allow(clippy::print_stdout)]
pub async fn add_card(
    app: &App,
    name: String,
    description: String,
    price: Decimal,
    image: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(app)?;

    let image = image
        .map(|path| {
            let bytes = std::fs::read(&path).map_err(|source| CliError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
            Ok::<_, CliError>(FileUpload { file_name, bytes })
        })
        .transpose()?;

    let created = app
        .dashboard
        .add_card(NewCard {
            name,
            description,
            price,
            image,
        })
        .await;

    match created.value {
        Some(card) => println!("Card added successfully! ({})", card.id),
        None if created.is_fallback() => {
            println!("Card created locally (record service unavailable)");
        }
        None => println!("Card added successfully!"),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error without a session or if the record service fails.
#[allow(clippy::print_stdout)]
pub async fn delete_card(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(app)?;
    app.dashboard.delete_card(&CardId::new(id)).await?;
    println!("Card deleted successfully!");
    Ok(())
}
