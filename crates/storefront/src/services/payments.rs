//! Local payments mirror.
//!
//! Payments that could not be recorded remotely are appended to a JSON array
//! under `payments`. The admin dashboard reads the same array as its
//! transaction fallback and addresses entries by position, so entries are
//! only ever appended, never reordered or removed.

use serde_json::Value;
use tracing::{info, warn};

use elite_cards_core::{KeyValueStore, StoreError};
use elite_cards_core::store::keys;

use crate::error::Result;
use crate::services::account::PaymentSubmission;

/// Append-only access to the local payments mirror.
#[derive(Debug, Clone)]
pub struct LocalPayments<S> {
    store: S,
}

impl<S: KeyValueStore> LocalPayments<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Number of mirrored payments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a payment and return its index.
    ///
    /// The entry is stored with a `pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror cannot be written.
    pub fn append(&self, payment: &PaymentSubmission) -> Result<usize> {
        let mut entries = self.entries();

        let mut entry = serde_json::to_value(payment).map_err(|source| StoreError::Serialize {
            key: keys::PAYMENTS.to_string(),
            source,
        })?;
        if let Some(fields) = entry.as_object_mut() {
            fields
                .entry("status")
                .or_insert_with(|| Value::from("pending"));
        }

        let index = entries.len();
        entries.push(entry);
        self.store.set_json(keys::PAYMENTS, &entries)?;
        info!(index, user_email = %payment.user_email, "Payment mirrored locally");
        Ok(index)
    }

    fn entries(&self) -> Vec<Value> {
        match self.store.get_json::<Vec<Value>>(keys::PAYMENTS) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Unreadable local payments, treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elite_cards_core::{CurrencyCode, MemoryStore};
    use rust_decimal::Decimal;

    use super::*;

    fn submission(email: &str) -> PaymentSubmission {
        PaymentSubmission {
            user_email: email.to_string(),
            amount: Decimal::from(35),
            currency: CurrencyCode::USD,
            amount_ghs: Decimal::new(42105, 2),
            submitted_at: "2026-10-19T09:30:00.000Z".to_string(),
            payment_screenshot: None,
        }
    }

    #[test]
    fn test_append_returns_positions() {
        let payments = LocalPayments::new(MemoryStore::new());
        assert!(payments.is_empty());
        assert_eq!(payments.append(&submission("a@example.com")).unwrap(), 0);
        assert_eq!(payments.append(&submission("b@example.com")).unwrap(), 1);
        assert_eq!(payments.len(), 2);
    }

    #[test]
    fn test_entries_use_browser_field_names() {
        let store = MemoryStore::new();
        LocalPayments::new(&store)
            .append(&submission("a@example.com"))
            .unwrap();

        let raw: Vec<Value> = store.get_json(keys::PAYMENTS).unwrap().unwrap();
        let entry = raw.first().unwrap();
        assert_eq!(entry["userEmail"], "a@example.com");
        assert_eq!(entry["amountGHS"], "421.05");
        assert_eq!(entry["status"], "pending");
    }

    #[test]
    fn test_existing_entries_are_kept() {
        let store = MemoryStore::with_entries([(
            keys::PAYMENTS,
            r#"[{"userEmail":"old@example.com","amount":10,"note":"kept"}]"#,
        )]);
        let payments = LocalPayments::new(&store);
        assert_eq!(payments.append(&submission("new@example.com")).unwrap(), 1);

        let raw: Vec<Value> = store.get_json(keys::PAYMENTS).unwrap().unwrap();
        assert_eq!(raw.first().unwrap()["note"], "kept");
    }
}
