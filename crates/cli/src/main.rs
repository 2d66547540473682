//! Elite Cards CLI - storefront and admin dashboard from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog in source order
//! elite-cli catalog list --stable
//!
//! # Fill the cart and check the total
//! elite-cli cart add card-4
//! elite-cli cart subtotal
//!
//! # Submit the cart as a payment and notify the operator
//! elite-cli checkout kofi@example.com
//!
//! # Review payments as the operator
//! elite-cli admin login admin@elitecards.com admin123
//! elite-cli admin transactions
//! elite-cli admin set-status local_0 approved
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `cart` - Show and change the cart
//! - `currency` - Convert and format amounts
//! - `account` - Storefront user and backend diagnostics
//! - `checkout` - Submit the cart as a payment
//! - `notify` - Send a transaction notification for the cart
//! - `admin` - Operator login and dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use elite_cards_core::PaymentStatus;

mod commands;
mod store;

use commands::App;
use store::DEFAULT_STORE_PATH;

#[derive(Parser)]
#[command(name = "elite-cli")]
#[command(author, version, about = "Elite Cards storefront and admin tools")]
struct Cli {
    /// Profile file holding the cart, sessions and the payments mirror
    #[arg(long, global = true, env = "ELITE_STORE_PATH", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Convert and format amounts
    Currency {
        #[command(subcommand)]
        action: CurrencyAction,
    },
    /// Storefront user and backend diagnostics
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Submit the cart as a payment and notify the operator
    Checkout {
        /// Customer email address
        email: String,
        /// Payment screenshot reference to attach
        #[arg(long)]
        screenshot: Option<String>,
    },
    /// Send a transaction notification for the current cart
    Notify {
        /// Customer email address
        customer_email: String,
        /// Payment id to quote in the notification
        #[arg(long)]
        payment_id: Option<String>,
    },
    /// Operator dashboard
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Keep catalog order instead of shuffling
        #[arg(long)]
        stable: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines
    Show,
    /// Add one unit of a product
    Add { id: String },
    /// Remove a product line
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Show the subtotal in USD and GHS
    Subtotal,
}

#[derive(Subcommand)]
enum CurrencyAction {
    /// Convert US dollars to cedis
    Convert { usd: Decimal },
    /// Format a value as a dollar price
    Format { value: String },
    /// Show the exchange rate
    Rate,
    /// Request a new exchange rate (logged, not applied)
    SetRate { rate: Decimal },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in a storefront user
    Login { email: String, password: String },
    /// Sign out the storefront user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List recent orders for the signed-in user
    Orders,
    /// Run backend diagnostics
    Check,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Start an operator session
    Login { email: String, password: String },
    /// End the operator session
    Logout,
    /// List cards
    Cards,
    /// List transactions
    Transactions,
    /// Show dashboard totals
    Stats,
    /// Set a transaction's review status
    SetStatus {
        id: String,
        /// `pending`, `approved` or `rejected`
        status: PaymentStatus,
    },
    /// Add a card
    AddCard {
        name: String,
        description: String,
        price: Decimal,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a card
    DeleteCard { id: String },
}

/// Install the tracing subscriber.
///
/// Logs go to stderr so command output stays clean. `ELITE_LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "elite_cli=info,elite_cards_storefront=info,elite_cards_admin=info".into()
    });

    let json = std::env::var("ELITE_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::from_env(&cli.store)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { stable } => commands::catalog::list(&app, stable).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&app).await?,
            CartAction::Add { id } => commands::cart::add(&app, &id)?,
            CartAction::Remove { id } => commands::cart::remove(&app, &id)?,
            CartAction::Clear => commands::cart::clear(&app)?,
            CartAction::Subtotal => commands::cart::subtotal(&app).await?,
        },
        Commands::Currency { action } => match action {
            CurrencyAction::Convert { usd } => commands::currency::convert(usd)?,
            CurrencyAction::Format { value } => commands::currency::format(&value),
            CurrencyAction::Rate => commands::currency::rate(),
            CurrencyAction::SetRate { rate } => commands::currency::set_rate(rate),
        },
        Commands::Account { action } => match action {
            AccountAction::Login { email, password } => {
                commands::account::login(&app, &email, &password).await?;
            }
            AccountAction::Logout => commands::account::logout(&app)?,
            AccountAction::Whoami => commands::account::whoami(&app),
            AccountAction::Orders => commands::account::orders(&app).await?,
            AccountAction::Check => commands::account::check(&app).await,
        },
        Commands::Checkout { email, screenshot } => {
            commands::notify::checkout(&app, &email, screenshot).await?;
        }
        Commands::Notify {
            customer_email,
            payment_id,
        } => commands::notify::notify(&app, &customer_email, payment_id).await?,
        Commands::Admin { action } => match action {
            AdminAction::Login { email, password } => {
                commands::admin::login(&app, &email, &password)?;
            }
            AdminAction::Logout => commands::admin::logout(&app)?,
            AdminAction::Cards => commands::admin::cards(&app).await?,
            AdminAction::Transactions => commands::admin::transactions(&app).await?,
            AdminAction::Stats => commands::admin::stats(&app).await?,
            AdminAction::SetStatus { id, status } => {
                commands::admin::set_status(&app, &id, status).await?;
            }
            AdminAction::AddCard {
                name,
                description,
                price,
                image,
            } => commands::admin::add_card(&app, name, description, price, image).await?,
            AdminAction::DeleteCard { id } => commands::admin::delete_card(&app, &id).await?,
        },
    }
    Ok(())
}
