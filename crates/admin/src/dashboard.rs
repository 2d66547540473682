//! Admin dashboard.
//!
//! Cards and transactions are read from the record service first and from a
//! local substitute when it is unavailable; every listing says which source
//! it came from. Cards fall back to a fixed sample set. Transactions fall
//! back to the local payments mirror, whose entries get synthesized
//! `local_<index>` ids.
//!
//! Status updates are routed by id: `local_` ids touch only the local
//! mirror, anything else is rewritten on the remote record.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use elite_cards_core::store::keys;
use elite_cards_core::{
    CardId, CurrencyCode, KeyValueStore, PaymentStatus, Price, Provenance, Transaction,
    TransactionId,
};

use crate::error::Result;
use crate::records::{
    CARDS, FileUpload, ListQuery, PAYMENT_PROOFS, Record, RecordForm, RecordStore, RecordsError,
};
use crate::resilient::{FallbackPolicy, Sourced, resilient_fetch};

/// Records fetched per listing.
const PAGE_SIZE: u32 = 50;

/// A card product as managed from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Attached image file name, if one was uploaded.
    pub image: Option<String>,
}

/// Wire shape of a `Cards` record.
#[derive(Deserialize)]
struct CardRecord {
    id: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Price", default)]
    price: Option<Decimal>,
    #[serde(rename = "Image", default)]
    image: Option<String>,
}

impl TryFrom<&Record> for Card {
    type Error = RecordsError;

    fn try_from(record: &Record) -> std::result::Result<Self, Self::Error> {
        let raw: CardRecord = record.decode()?;
        Ok(Self {
            id: CardId::new(raw.id),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            price: raw.price.unwrap_or_default(),
            image: raw.image.filter(|image| !image.is_empty()),
        })
    }
}

/// A card to be created.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<FileUpload>,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_cards: usize,
    pub total_transactions: usize,
    pub pending_transactions: usize,
    /// Sum of transaction amounts in US dollars.
    pub revenue: Decimal,
    pub cards_source: Provenance,
    pub transactions_source: Provenance,
}

impl DashboardStats {
    /// Revenue as shown on the dashboard, e.g. `$149.90`.
    #[must_use]
    pub fn revenue_display(&self) -> String {
        Price::usd(self.revenue).to_string()
    }
}

/// Dashboard operations over the record service and the local store.
#[derive(Debug, Clone)]
pub struct AdminDashboard<S, R> {
    store: S,
    records: R,
}

impl<S: KeyValueStore, R: RecordStore> AdminDashboard<S, R> {
    #[must_use]
    pub const fn new(store: S, records: R) -> Self {
        Self { store, records }
    }

    /// Newest cards, or the sample set if the record service fails.
    #[instrument(skip(self))]
    pub async fn get_cards(&self) -> Sourced<Vec<Card>> {
        let remote = async {
            let page = self
                .records
                .list(CARDS, &ListQuery::newest_first(1, PAGE_SIZE))
                .await?;
            Ok::<_, RecordsError>(
                page.items
                    .iter()
                    .filter_map(|record| match Card::try_from(record) {
                        Ok(card) => Some(card),
                        Err(e) => {
                            warn!(error = %e, "Skipping malformed card record");
                            None
                        }
                    })
                    .collect(),
            )
        };

        resilient_fetch("cards", remote, FallbackPolicy::OnError, fallback_cards).await
    }

    /// Newest transactions, or the local payments mirror if the record
    /// service fails or has none.
    #[instrument(skip(self))]
    pub async fn get_transactions(&self) -> Sourced<Vec<Transaction>> {
        let remote = async {
            let page = self
                .records
                .list(PAYMENT_PROOFS, &ListQuery::newest_first(1, PAGE_SIZE))
                .await?;
            Ok::<_, RecordsError>(
                page.items
                    .iter()
                    .map(|record| self.transaction_from_proof(record))
                    .collect(),
            )
        };

        resilient_fetch(
            "transactions",
            remote,
            FallbackPolicy::OnErrorOrEmpty,
            || self.local_transactions(),
        )
        .await
    }

    /// Totals across cards and transactions.
    pub async fn stats(&self) -> DashboardStats {
        let cards = self.get_cards().await;
        let transactions = self.get_transactions().await;

        DashboardStats {
            total_cards: cards.value.len(),
            total_transactions: transactions.value.len(),
            pending_transactions: transactions.value.iter().filter(|t| t.is_pending()).count(),
            revenue: total_revenue(&transactions.value),
            cards_source: cards.provenance,
            transactions_source: transactions.provenance,
        }
    }

    /// Set the review status of a transaction.
    ///
    /// A `local_<index>` id changes only that entry of the local mirror and
    /// does nothing if the entry does not exist. Any other id is updated on
    /// the record service by rewriting the status inside its `note`.
    ///
    /// # Errors
    ///
    /// Returns an error if the local mirror cannot be written or the remote
    /// record cannot be read or updated.
    #[instrument(skip(self))]
    pub async fn update_transaction_status(
        &self,
        id: &TransactionId,
        status: PaymentStatus,
    ) -> Result<()> {
        if id.is_local() {
            self.update_local_status(id, status)?;
            return Ok(());
        }

        let record = self.records.get_one(PAYMENT_PROOFS, id.as_str()).await?;
        let mut note = parse_note(record.field_str("note"));
        note.insert("status".to_string(), Value::from(status.as_str()));

        let mut fields = Map::new();
        fields.insert("note".to_string(), Value::String(Value::Object(note).to_string()));
        self.records
            .update(PAYMENT_PROOFS, id.as_str(), fields)
            .await?;

        info!(transaction_id = %id, status = %status, "Transaction status updated");
        Ok(())
    }

    /// Create a card on the record service.
    ///
    /// If the service is unavailable the failure is logged and the result
    /// is tagged as local with no stored card: nothing was persisted.
    #[instrument(skip(self, card), fields(name = %card.name))]
    pub async fn add_card(&self, card: NewCard) -> Sourced<Option<Card>> {
        let mut form = RecordForm::new()
            .text("Name", card.name)
            .text("Description", card.description)
            .text("Price", card.price.normalize().to_string());
        if let Some(image) = card.image {
            form = form.file("Image", image);
        }

        match self.records.create(CARDS, form).await {
            Ok(record) => {
                info!(card_id = %record.id, "Card added");
                Sourced::remote(Card::try_from(&record).ok())
            }
            Err(e) => {
                warn!(error = %e, "Record service unavailable, card not saved");
                Sourced::fallback(None)
            }
        }
    }

    /// Delete a card from the record service.
    ///
    /// # Errors
    ///
    /// Returns an error if the record service fails.
    #[instrument(skip(self))]
    pub async fn delete_card(&self, id: &CardId) -> Result<()> {
        self.records.delete(CARDS, id.as_str()).await?;
        info!(card_id = %id, "Card deleted");
        Ok(())
    }

    /// Image URL for a card: the uploaded file, or a local image named
    /// after the card.
    #[must_use]
    pub fn card_image_url(&self, card: &Card) -> String {
        match &card.image {
            Some(image) => self.records.file_url(CARDS, card.id.as_str(), image),
            None => format!("images/{}.png", slugify(&card.name)),
        }
    }

    fn transaction_from_proof(&self, record: &Record) -> Transaction {
        let note = parse_note(record.field_str("note"));
        let screenshot = record
            .field_str("Screenshot")
            .filter(|file| !file.is_empty())
            .map(|file| self.records.file_url(PAYMENT_PROOFS, &record.id, file));
        let submitted_at = string_field(&note, "submittedAt")
            .or_else(|| Some(record.created.clone()).filter(|created| !created.is_empty()));

        Transaction {
            id: TransactionId::new(record.id.clone()),
            user_email: record.field_str("email").unwrap_or_default().to_string(),
            amount: decimal_field(&note, "amount").unwrap_or_default(),
            currency: currency_field(&note),
            amount_ghs: decimal_field(&note, "amountGHS").unwrap_or_default(),
            status: status_field(&note),
            submitted_at,
            screenshot,
        }
    }

    fn local_transactions(&self) -> Vec<Transaction> {
        self.local_payments()
            .iter()
            .enumerate()
            .map(|(index, payment)| {
                let empty = Map::new();
                let fields = payment.as_object().unwrap_or(&empty);
                Transaction {
                    id: TransactionId::local(index),
                    user_email: string_field(fields, "userEmail").unwrap_or_default(),
                    amount: decimal_field(fields, "amount").unwrap_or_default(),
                    currency: currency_field(fields),
                    amount_ghs: decimal_field(fields, "amountGHS").unwrap_or_default(),
                    status: status_field(fields),
                    submitted_at: string_field(fields, "submittedAt"),
                    screenshot: string_field(fields, "paymentScreenshot"),
                }
            })
            .collect()
    }

    /// The local mirror as raw JSON, so unknown fields survive a rewrite.
    fn local_payments(&self) -> Vec<Value> {
        match self.store.get_json::<Vec<Value>>(keys::PAYMENTS) {
            Ok(payments) => payments.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Unreadable local payments, treating as empty");
                Vec::new()
            }
        }
    }

    fn update_local_status(&self, id: &TransactionId, status: PaymentStatus) -> Result<()> {
        let Some(index) = id.local_index() else {
            warn!(transaction_id = %id, "Malformed local transaction id");
            return Ok(());
        };

        let mut payments = self.local_payments();
        let Some(entry) = payments.get_mut(index).and_then(Value::as_object_mut) else {
            debug!(transaction_id = %id, "No local payment at index");
            return Ok(());
        };

        entry.insert("status".to_string(), Value::from(status.as_str()));
        self.store.set_json(keys::PAYMENTS, &payments)?;
        info!(transaction_id = %id, status = %status, "Local transaction status updated");
        Ok(())
    }
}

/// Sum of transaction amounts. An amount that would overflow the total is
/// left out.
fn total_revenue(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |total, transaction| {
        total.checked_add(transaction.amount).unwrap_or_else(|| {
            warn!(
                transaction_id = %transaction.id,
                amount = %transaction.amount,
                "Revenue overflow, amount left out"
            );
            total
        })
    })
}

/// Parse a payment proof `note`. Missing or malformed notes are empty.
fn parse_note(raw: Option<&str>) -> Map<String, Value> {
    match raw.map(serde_json::from_str::<Value>) {
        None => Map::new(),
        Some(Ok(Value::Object(note))) => note,
        Some(Ok(_)) => {
            debug!("Payment note is not an object");
            Map::new()
        }
        Some(Err(e)) => {
            debug!(error = %e, "Malformed payment note");
            Map::new()
        }
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Numbers and numeric strings both count.
fn decimal_field(fields: &Map<String, Value>, name: &str) -> Option<Decimal> {
    match fields.get(name)? {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

fn currency_field(fields: &Map<String, Value>) -> CurrencyCode {
    fields
        .get("currency")
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default()
}

fn status_field(fields: &Map<String, Value>) -> PaymentStatus {
    fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(|status| status.parse().ok())
        .unwrap_or_default()
}

/// Lowercase the name and replace each whitespace run with `-`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Cards shown when the record service is unreachable.
fn fallback_cards() -> Vec<Card> {
    [
        ("1", "American Express", "Premium card with exclusive benefits", 100),
        ("2", "Mastercard Platinum", "Platinum card with worldwide acceptance", 70),
        ("3", "Visa Gold", "Gold card with premium rewards", 200),
        ("4", "Titanium Discover", "Titanium card with cashback rewards", 50),
        ("5", "Visa Infinite", "Ultimate card with unlimited possibilities", 35),
    ]
    .into_iter()
    .map(|(id, name, description, price)| Card {
        id: CardId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::from(price),
        image: None,
    })
    .collect()
}
