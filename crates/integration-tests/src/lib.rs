//! Integration tests for Elite Cards.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elite-cards-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to payments mirror to dashboard review
//! - `admin_records` - Dashboard against the record service
//! - `admin_auth` - Operator sessions across restarts
//! - `notifications` - Transaction notices through the mail relay
//! - `pages` - Fragment loading and caching
//!
//! Every test runs in-process. The fakes below stand in for the record
//! service, the mail relay and the fragment server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Map, Value};

use elite_cards_admin::config::EmailConfig;
use elite_cards_admin::records::{
    ListQuery, Record, RecordForm, RecordPage, RecordStore, RecordsError,
};
use elite_cards_admin::services::email::{MailRelay, RelayError, RelayResponse, TemplateParams};
use elite_cards_storefront::pages::{FragmentSource, PageError};
use elite_cards_storefront::services::account::PaymentSubmission;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Record Service
// =============================================================================

#[derive(Debug, Default)]
struct Collections {
    records: HashMap<String, Vec<Record>>,
    updates: Vec<(String, String, Map<String, Value>)>,
    created: Vec<(String, RecordForm)>,
    next_id: usize,
}

/// In-memory record service.
///
/// An offline store fails every call the way an unreachable backend does.
#[derive(Debug, Clone, Default)]
pub struct FakeRecordStore {
    state: Arc<Mutex<Collections>>,
    offline: bool,
}

impl FakeRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Add a record with the given fields to `collection`.
    #[must_use]
    pub fn with_record(self, collection: &str, id: &str, created: &str, fields: Value) -> Self {
        lock(&self.state)
            .records
            .entry(collection.to_string())
            .or_default()
            .push(record(id, created, fields));
        self
    }

    /// Every `update` call so far as `(collection, id, fields)`.
    #[must_use]
    pub fn updates(&self) -> Vec<(String, String, Map<String, Value>)> {
        lock(&self.state).updates.clone()
    }

    /// Every `create` call so far as `(collection, form)`.
    #[must_use]
    pub fn created(&self) -> Vec<(String, RecordForm)> {
        lock(&self.state).created.clone()
    }

    /// Ids currently stored in `collection`.
    #[must_use]
    pub fn ids(&self, collection: &str) -> Vec<String> {
        lock(&self.state)
            .records
            .get(collection)
            .map(|records| records.iter().map(|r| r.id.clone()).collect())
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), RecordsError> {
        if self.offline {
            return Err(RecordsError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Build a record from a JSON object of fields.
#[must_use]
pub fn record(id: &str, created: &str, fields: Value) -> Record {
    Record {
        id: id.to_string(),
        created: created.to_string(),
        fields: match fields {
            Value::Object(fields) => fields,
            _ => Map::new(),
        },
    }
}

impl RecordStore for FakeRecordStore {
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<RecordPage, RecordsError> {
        self.check_online()?;
        let items = lock(&self.state)
            .records
            .get(collection)
            .cloned()
            .unwrap_or_default();

        Ok(RecordPage {
            page: query.page,
            per_page: query.per_page,
            total_items: items.len() as u64,
            total_pages: 1,
            items,
        })
    }

    async fn get_one(&self, collection: &str, id: &str) -> Result<Record, RecordsError> {
        self.check_online()?;
        lock(&self.state)
            .records
            .get(collection)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned())
            .ok_or_else(|| RecordsError::NotFound(format!("{collection}/{id}")))
    }

    async fn create(&self, collection: &str, form: RecordForm) -> Result<Record, RecordsError> {
        self.check_online()?;
        let mut state = lock(&self.state);
        state.next_id += 1;

        let mut fields = Map::new();
        for (name, value) in &form.fields {
            fields.insert(name.clone(), Value::from(value.as_str()));
        }
        for (name, upload) in &form.files {
            fields.insert(name.clone(), Value::from(upload.file_name.as_str()));
        }
        let created = Record {
            id: format!("rec{}", state.next_id),
            created: "2024-06-01 09:30:00.000Z".to_string(),
            fields,
        };

        state.created.push((collection.to_string(), form));
        state
            .records
            .entry(collection.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, RecordsError> {
        self.check_online()?;
        let mut state = lock(&self.state);
        state
            .updates
            .push((collection.to_string(), id.to_string(), fields.clone()));

        let record = state
            .records
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| RecordsError::NotFound(format!("{collection}/{id}")))?;
        record.fields.extend(fields);
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RecordsError> {
        self.check_online()?;
        let mut state = lock(&self.state);
        let records = state.records.entry(collection.to_string()).or_default();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(RecordsError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }

    fn file_url(&self, collection: &str, record_id: &str, file_name: &str) -> String {
        format!("http://records.test/api/files/{collection}/{record_id}/{file_name}")
    }
}

// =============================================================================
// Mail Relay
// =============================================================================

/// Relay that records what it was asked to send.
#[derive(Debug, Clone, Default)]
pub struct FakeRelay {
    sent: Arc<Mutex<Vec<(String, String, TemplateParams)>>>,
    rejecting: bool,
}

impl FakeRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A relay that answers every send with a 400.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            rejecting: true,
            ..Self::default()
        }
    }

    /// Sends so far as `(service_id, template_id, params)`.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, String, TemplateParams)> {
        lock(&self.sent).clone()
    }
}

impl MailRelay for FakeRelay {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
        _public_key: &SecretString,
    ) -> Result<RelayResponse, RelayError> {
        if self.rejecting {
            return Err(RelayError::Api {
                status: 400,
                message: "The template ID is invalid".to_string(),
            });
        }

        lock(&self.sent).push((
            service_id.to_string(),
            template_id.to_string(),
            params.clone(),
        ));
        Ok(RelayResponse {
            status: 200,
            text: "OK".to_string(),
        })
    }
}

/// Relay settings with real-looking keys.
#[must_use]
pub fn configured_email() -> EmailConfig {
    EmailConfig {
        service_id: "service_live".to_string(),
        template_id: "template_txn".to_string(),
        public_key: SecretString::from("pk_live_8f2a"),
        ..EmailConfig::default()
    }
}

// =============================================================================
// Fragments
// =============================================================================

/// Serves fixed fragments and counts fetches.
#[derive(Debug, Clone, Default)]
pub struct FakeFragmentSource {
    pages: Arc<HashMap<String, String>>,
    fetches: Arc<AtomicUsize>,
}

impl FakeFragmentSource {
    /// Serve `pages` as `(path, html)` pairs; anything else is a 404.
    #[must_use]
    pub fn new<'a>(pages: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(path, html)| (path.to_string(), html.to_string()))
                    .collect(),
            ),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl FragmentSource for FakeFragmentSource {
    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| PageError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A checkout submission for `email` over `amount` dollars.
#[must_use]
pub fn submission(email: &str, amount: Decimal) -> PaymentSubmission {
    PaymentSubmission {
        user_email: email.to_string(),
        amount,
        currency: elite_cards_core::CurrencyCode::USD,
        amount_ghs: elite_cards_storefront::currency::usd_to_ghs(amount),
        submitted_at: "2024-06-01T09:30:00.000Z".to_string(),
        payment_screenshot: None,
    }
}
