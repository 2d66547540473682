//! Remote record service.
//!
//! The dashboard talks to a `PocketBase` backend through the [`RecordStore`]
//! trait. Records are loosely typed: every field other than `id` and
//! `created` is kept as raw JSON and decoded by the caller.

mod pocketbase;

pub use pocketbase::PocketBaseClient;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Collection of card products.
pub const CARDS: &str = "Cards";

/// Collection of submitted payment proofs.
pub const PAYMENT_PROOFS: &str = "payment_proofs";

/// Errors that can occur when talking to the record service.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response or record could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub created: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String value of `name`, if present and a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Decode the whole record into `T`.
    ///
    /// # Errors
    ///
    /// Returns `RecordsError::Parse` if the record does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordsError> {
        let value = serde_json::to_value(self)
            .map_err(|e| RecordsError::Parse(format!("record {}: {e}", self.id)))?;
        serde_json::from_value(value)
            .map_err(|e| RecordsError::Parse(format!("record {}: {e}", self.id)))
    }
}

/// Pagination and ordering for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<String>,
}

impl ListQuery {
    /// One page, most recently created first.
    #[must_use]
    pub fn newest_first(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            sort: Some("-created".to_string()),
        }
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u64,
    pub items: Vec<Record>,
}

/// A file attached to a create request.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart body for creating a record.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, FileUpload)>,
}

impl RecordForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, upload: FileUpload) -> Self {
        self.files.push((name.into(), upload));
        self
    }

    /// Value of the first text field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// CRUD access to record collections.
pub trait RecordStore: Send + Sync {
    /// List one page of `collection`.
    fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<RecordPage, RecordsError>> + Send;

    /// Fetch one record by id.
    fn get_one(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Record, RecordsError>> + Send;

    /// Create a record from a multipart form.
    fn create(
        &self,
        collection: &str,
        form: RecordForm,
    ) -> impl Future<Output = Result<Record, RecordsError>> + Send;

    /// Overwrite the given fields of a record.
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<Record, RecordsError>> + Send;

    /// Delete a record.
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), RecordsError>> + Send;

    /// Public URL of a file attached to a record.
    fn file_url(&self, collection: &str, record_id: &str, file_name: &str) -> String;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record: Record = serde_json::from_str(
            r#"{"id":"abc","created":"2024-05-01 10:00:00.000Z","collectionName":"Cards","Name":"Visa Gold","Price":200}"#,
        )
        .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.field_str("Name"), Some("Visa Gold"));
        assert_eq!(record.fields.get("Price"), Some(&Value::from(200)));
    }

    #[test]
    fn test_decode() {
        #[derive(Deserialize)]
        struct Named {
            id: String,
            #[serde(rename = "Name")]
            name: String,
        }

        let record: Record = serde_json::from_str(r#"{"id":"abc","Name":"Visa Gold"}"#).unwrap();
        let named: Named = record.decode().unwrap();
        assert_eq!(named.id, "abc");
        assert_eq!(named.name, "Visa Gold");
    }

    #[test]
    fn test_page_parses_list_response() {
        let page: RecordPage = serde_json::from_str(
            r#"{"page":1,"perPage":50,"totalItems":1,"totalPages":1,"items":[{"id":"x1"}]}"#,
        )
        .unwrap();
        assert_eq!(page.per_page, 50);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_form_builder() {
        let form = RecordForm::new()
            .text("Name", "Visa Gold")
            .text("Price", "200");
        assert_eq!(form.get("Price"), Some("200"));
        assert_eq!(form.get("Image"), None);
    }
}
